//! CLI administration tool for littleu.
//!
//! Manages accounts and inspects links directly in the configured storage
//! engine, without going through the HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # List accounts
//! cargo run --bin admin -- users list
//!
//! # Create an account (prompts for missing values)
//! cargo run --bin admin -- users add --username bob
//!
//! # List every link
//! cargo run --bin admin -- links list
//!
//! # Short code arithmetic
//! cargo run --bin admin -- codec encode 62
//! cargo run --bin admin -- codec decode ba
//! ```
//!
//! # Environment Variables
//!
//! The same variables as the server (see `littleu::config`), usually from `.env`.
//! `codec` commands need none.

use littleu::config::{self, Config};
use littleu::engine::{Engine, EngineRegistry};
use littleu::utils::codec;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::{Input, Password};

/// CLI tool for managing littleu.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level command groups.
#[derive(Subcommand)]
enum Commands {
    /// Manage accounts
    Users {
        #[command(subcommand)]
        action: UserAction,
    },

    /// Inspect links
    Links {
        #[command(subcommand)]
        action: LinkAction,
    },

    /// Convert between link ids and short codes
    Codec {
        #[command(subcommand)]
        action: CodecAction,
    },
}

#[derive(Subcommand)]
enum UserAction {
    /// List all accounts
    List,

    /// Create an account
    Add {
        #[arg(short, long)]
        username: Option<String>,

        /// Password (prompted without echo if omitted)
        #[arg(short, long)]
        password: Option<String>,
    },
}

#[derive(Subcommand)]
enum LinkAction {
    /// List all links
    List,
}

#[derive(Subcommand)]
enum CodecAction {
    /// Short code of a link id
    Encode { id: i64 },

    /// Link id of a short code
    Decode { code: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::Codec { action } => handle_codec(action),
        Commands::Users { action } => {
            let engine = open_engine().await?;
            handle_users(action, engine.as_ref()).await
        }
        Commands::Links { action } => {
            let engine = open_engine().await?;
            match action {
                LinkAction::List => list_links(engine.as_ref()).await,
            }
        }
    }
}

async fn open_engine() -> Result<Box<dyn Engine>> {
    let config: Config = config::load_from_env()?;

    if config.db_engine == "memory" {
        println!(
            "{}",
            "⚠️  DB_ENGINE=memory: changes are lost when this command exits".yellow()
        );
    }

    EngineRegistry::default()
        .open(&config.db_engine, &config)
        .await
        .context("Failed to open storage engine")
}

fn handle_codec(action: CodecAction) -> Result<()> {
    match action {
        CodecAction::Encode { id } => {
            let code = codec::encode(id);
            if code.is_empty() {
                anyhow::bail!("Link ids start at 1, got {}", id);
            }
            println!("{}", code.bright_yellow());
        }
        CodecAction::Decode { code } => {
            let id = codec::try_decode(&code)
                .with_context(|| format!("'{}' is not a valid short code", code))?;
            println!("{}", id.to_string().bright_yellow());
        }
    }
    Ok(())
}

async fn handle_users(action: UserAction, engine: &dyn Engine) -> Result<()> {
    match action {
        UserAction::List => list_users(engine).await,
        UserAction::Add { username, password } => add_user(engine, username, password).await,
    }
}

/// Lists all accounts.
///
/// # Output Format
///
/// ```text
/// 👥 Users (postgresql)
///
///   ID                         Username                 Created
///   ───────────────────────────────────────────────────────────────────────────
///   1                          bob                      2026-01-15 10:30
/// ```
async fn list_users(engine: &dyn Engine) -> Result<()> {
    println!(
        "{} {}",
        "👥 Users".bright_blue().bold(),
        format!("({})", engine.name()).bright_black()
    );
    println!();

    let users = engine
        .users()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to list users: {}", e))?;

    if users.is_empty() {
        println!("{}", "  No users found".yellow());
        println!();
        println!(
            "  Create one with: {} admin users add",
            "cargo run --bin".bright_cyan()
        );
        return Ok(());
    }

    println!(
        "  {:<26} {:<24} {:<16}",
        "ID".bright_white().bold(),
        "Username".bright_white().bold(),
        "Created".bright_white().bold()
    );
    println!("  {}", "─".repeat(75).bright_black());

    for user in &users {
        println!(
            "  {:<26} {:<24} {}",
            user.id.bright_black(),
            user.username.cyan(),
            user.created_at
                .format("%Y-%m-%d %H:%M")
                .to_string()
                .bright_black()
        );
    }

    println!();
    println!("  Total: {}", users.len().to_string().bright_white().bold());
    println!();

    Ok(())
}

async fn add_user(
    engine: &dyn Engine,
    username: Option<String>,
    password: Option<String>,
) -> Result<()> {
    println!("{}", "👤 Create User".bright_blue().bold());
    println!();

    let username = match username {
        Some(u) => u,
        None => Input::new().with_prompt("Username").interact_text()?,
    };

    let password = match password {
        Some(p) => p,
        None => Password::new()
            .with_prompt("Password")
            .with_confirmation("Repeat password", "Passwords do not match")
            .interact()?,
    };

    let user = engine
        .add_user(&username, &password)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to create user: {}", e))?;

    println!();
    println!("{}", "✅ User created successfully!".green().bold());
    println!("  Username: {}", user.username.cyan());
    println!("  ID:       {}", user.id.bright_black());
    println!();

    Ok(())
}

/// Lists all links ordered by id.
async fn list_links(engine: &dyn Engine) -> Result<()> {
    println!(
        "{} {}",
        "🔗 Links".bright_blue().bold(),
        format!("({})", engine.name()).bright_black()
    );
    println!();

    let links = engine
        .links()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to list links: {}", e))?;

    if links.is_empty() {
        println!("{}", "  No links found".yellow());
        return Ok(());
    }

    println!(
        "  {:<12} {:<26} {:<16} {}",
        "Code".bright_white().bold(),
        "Owner".bright_white().bold(),
        "Created".bright_white().bold(),
        "URL".bright_white().bold()
    );
    println!("  {}", "─".repeat(90).bright_black());

    for link in &links {
        println!(
            "  {:<12} {:<26} {:<16} {}",
            link.code.bright_yellow(),
            link.owner.bright_black(),
            link.created_at.format("%Y-%m-%d %H:%M").to_string(),
            link.long_url
        );
    }

    println!();
    println!("  Total: {}", links.len().to_string().bright_white().bold());
    println!();

    Ok(())
}
