//! CLI auth command handlers for login, status, refresh and logout.

use crate::client::LumoClient;
use crate::error::LumoError;

/// Handle `lumo auth login <email>`.
pub async fn handle_login(
    client: &LumoClient,
    email: &str,
    password: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let response = client.auth().login(email, password).await?;
    if response.is_success() {
        let name = response
            .user
            .as_ref()
            .map(|user| user.username.as_str())
            .unwrap_or(email);
        println!("✅ Signed in as {name}");
        return Ok(());
    }

    if response.needs_verification() {
        eprintln!("📧 Please verify your email before logging in.");
    } else {
        eprintln!(
            "❌ Login failed: {}",
            response.message.as_deref().unwrap_or("Invalid credentials")
        );
    }
    std::process::exit(1);
}

/// Handle `lumo auth status`.
pub async fn handle_status(client: &LumoClient) -> Result<(), Box<dyn std::error::Error>> {
    println!("🔐 Session Status\n");

    if client.store().get().is_none() {
        println!("  ❌ Not signed in");
        return Ok(());
    }

    match client.auth().me().await {
        Ok(user) => {
            let verified = if user.is_verified { "✅" } else { "⚠️  unverified" };
            println!("  ✅ Signed in as {} <{}> {verified}", user.username, user.email);
            println!("  Member since {}", user.created_at.format("%Y-%m-%d"));
        }
        Err(LumoError::Unauthenticated) => println!("  ❌ Session expired"),
        Err(e) => println!("  ⚠️  Error: {e}"),
    }
    Ok(())
}

/// Handle `lumo auth refresh`.
pub async fn handle_refresh(client: &LumoClient) -> Result<(), Box<dyn std::error::Error>> {
    match client.store().refresh().await {
        Ok(_) => {
            println!("✅ Credential refreshed");
            Ok(())
        }
        Err(e) => {
            eprintln!("❌ Refresh failed: {e}");
            std::process::exit(1);
        }
    }
}

/// Handle `lumo auth logout`.
pub async fn handle_logout(client: &LumoClient) -> Result<(), Box<dyn std::error::Error>> {
    client.auth().logout().await;
    println!("✅ Signed out");
    Ok(())
}
