//! Lumo CLI binary entry point.

use clap::Parser;
use lumo::cli::{AuthCommands, Cli, Commands};
use lumo::client::LumoClient;
use lumo::config::LumoConfig;
use lumo::error::LumoError;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("LUMO_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = LumoConfig::from_env();
    if let Some(url) = cli.api_url {
        config = config.with_api_url(url);
    }

    let client = match LumoClient::new(config) {
        Ok(client) => client,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Commands::Auth(auth_args) => match auth_args.command {
            AuthCommands::Login(args) => {
                lumo::cli::auth::handle_login(&client, &args.email, &args.password).await
            }
            AuthCommands::Status => lumo::cli::auth::handle_status(&client).await,
            AuthCommands::Refresh => lumo::cli::auth::handle_refresh(&client).await,
            AuthCommands::Logout => lumo::cli::auth::handle_logout(&client).await,
        },
        Commands::Photos(photo_args) => lumo::cli::photos::handle(&client, photo_args.command).await,
    };

    if let Err(e) = result {
        if matches!(e.downcast_ref::<LumoError>(), Some(LumoError::Unauthenticated)) {
            eprintln!("Session expired. Run `lumo auth login <email>` to sign in again.");
        } else {
            eprintln!("Error: {e}");
        }
        std::process::exit(1);
    }
}
