//! # Create User Utility
//!
//! Registers a user directly in the database, for deployments that keep
//! registration off the public HTTP surface.
//!
//! ## Usage
//!
//! ```bash
//! cargo run --package create-user --bin create_user -- <username> <email> [password]
//! ```
//!
//! When the password is omitted it is read from stdin. The database comes from
//! `DATABASE_URL` (default `sqlite:data/chat.db`) and the schema is created if
//! missing.

use std::io::{self, Write};
use std::time::Duration;

use anyhow::{bail, Context};
use lib_auth::{hash_password, MIN_PASSWORD_LEN};
use lib_core::model::store::{models::UserForCreate, UserRepository};
use lib_core::{create_pool, init_schema};
use lib_utils::{get_env_or, validate_email, validate_length_range, validate_min_length};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let mut args = std::env::args().skip(1);
    let (Some(username), Some(email)) = (args.next(), args.next()) else {
        bail!("usage: create_user <username> <email> [password]");
    };
    let password = match args.next() {
        Some(password) => password,
        None => read_password()?,
    };

    let username = username.trim().to_string();
    validate_length_range(&username, 3, 50, "Username").map_err(anyhow::Error::msg)?;
    validate_email(&email).map_err(anyhow::Error::msg)?;
    validate_min_length(&password, MIN_PASSWORD_LEN, "Password").map_err(anyhow::Error::msg)?;

    println!("============================================");
    println!("  Create User Utility");
    println!("============================================");

    let database_url = get_env_or("DATABASE_URL", "sqlite:data/chat.db");
    println!("Connecting to {}...", database_url);
    let pool = create_pool(&database_url, Duration::from_secs(5)).await?;
    init_schema(&pool).await?;

    if UserRepository::find_by_username(&pool, &username).await?.is_some() {
        bail!("username '{}' is already taken", username);
    }
    if UserRepository::find_by_email(&pool, &email).await?.is_some() {
        bail!("email '{}' is already registered", email);
    }

    let password_hash = hash_password(&password).context("failed to hash password")?;
    let user = UserRepository::create_with(&pool, UserForCreate::new(username, email, password_hash)).await?;

    println!("Created user '{}' (id {}).", user.username, user.id);
    Ok(())
}

fn read_password() -> anyhow::Result<String> {
    print!("Password: ");
    io::stdout().flush()?;

    let mut password = String::new();
    io::stdin().read_line(&mut password)?;
    Ok(password.trim_end_matches(['\r', '\n']).to_string())
}
