//! CLI entry point for Lumo.

pub mod auth;
pub mod photos;

use clap::{Parser, Subcommand};

use crate::types::TagKind;

/// Lumo photo search CLI
#[derive(Parser, Debug)]
#[command(name = "lumo", version, about = "Lumo — photo search from the terminal")]
pub struct Cli {
    /// Backend base URL (overrides LUMO_API_URL)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Session management
    Auth(AuthArgs),
    /// Collection, search and tagging
    Photos(PhotoArgs),
}

/// Arguments for the `auth` subcommand group.
#[derive(Parser, Debug)]
pub struct AuthArgs {
    #[command(subcommand)]
    pub command: AuthCommands,
}

/// Auth subcommands.
#[derive(Subcommand, Debug)]
pub enum AuthCommands {
    /// Sign in with email and password
    Login(LoginArgs),
    /// Show whether a credential is held and who it belongs to
    Status,
    /// Force a credential refresh
    Refresh,
    /// Sign out and drop the local credential
    Logout,
}

/// Arguments for `lumo auth login`.
#[derive(Parser, Debug)]
pub struct LoginArgs {
    /// Account email
    pub email: String,

    /// Account password
    #[arg(long, env = "LUMO_PASSWORD", hide_env_values = true)]
    pub password: String,
}

/// Arguments for the `photos` subcommand group.
#[derive(Parser, Debug)]
pub struct PhotoArgs {
    #[command(subcommand)]
    pub command: PhotoCommands,
}

/// Photo subcommands.
#[derive(Subcommand, Debug)]
pub enum PhotoCommands {
    /// List the photos in your collection
    List,
    /// Show one photo with recommendations
    Show { id: String },
    /// Search photos by free text
    Search { query: String },
    /// Save an image URL into your collection
    Save { image_url: String },
    /// Add a tag to a photo
    Tag {
        id: String,
        tag: String,
        /// Tag list to add to (custom, ai)
        #[arg(long, default_value = "custom")]
        kind: TagKind,
    },
    /// Remove a tag from a photo
    Untag { id: String, tag: String },
    /// Show your recent searches
    History,
}

impl Cli {
    /// Parse CLI arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
