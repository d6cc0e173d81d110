/*
 *  Copyright 2025-2026 Likeswap Contributors
 *
 *  Licensed under the Apache License, Version 2.0 (the "License");
 *  you may not use this file except in compliance with the License.
 *  You may obtain a copy of the License at
 *
 *      http://www.apache.org/licenses/LICENSE-2.0
 *
 *  Unless required by applicable law or agreed to in writing, software
 *  distributed under the License is distributed on an "AS IS" BASIS,
 *  WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 *  See the License for the specific language governing permissions and
 *  limitations under the License.
 */

//! likeswap CLI - operator interface and service host for the exchange engine.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

mod commands;
mod config;
mod duration;

use commands::Session;
use config::ConfigLoader;

/// likeswap - reciprocal link exchange engine
#[derive(Parser)]
#[command(name = "likeswap")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// SQLite database location (overrides the config file)
    #[arg(long, env = "DATABASE_URL", global = true)]
    database_url: Option<String>,

    /// Configuration file (default: ./likeswap.toml, then the user and system config dirs)
    #[arg(long, env = "LIKESWAP_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply pending database migrations
    Migrate,

    /// Run the eviction and reminder loops until interrupted
    Serve,

    /// Register a user, optionally recording who invited them
    Register {
        user_id: i64,

        #[arg(long)]
        invited_by: Option<i64>,
    },

    /// Submit a link to the queue
    Submit { user_id: i64, link: String },

    /// Show the user's batch, assigning one if needed
    Tasks { user_id: i64 },

    /// Confirm the current step of the user's batch
    Confirm { user_id: i64 },

    /// Record that the user followed a link (click collector entry point)
    Click { user_id: i64, link: String },

    /// Show the leaderboard
    Top {
        /// Number of rows (defaults to the configured leaderboard size)
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Administrative commands
    Admin {
        #[command(subcommand)]
        command: AdminCommands,
    },
}

#[derive(Subcommand)]
enum AdminCommands {
    /// Lift a ban and reset warnings
    Unban { user_id: i64 },

    /// List banned users
    Banned,

    /// List the queue, front first
    Items,

    /// Delete queued items by id
    Delete {
        #[arg(required = true)]
        ids: Vec<i64>,
    },

    /// Print counters, the leaderboard and the referral report as JSON
    Stats,

    /// Show referral counts
    Invites,

    /// Evict items that outlived the TTL without collecting a credit
    Evict {
        /// TTL to apply instead of the configured one (e.g. "24h", "1d12h")
        #[arg(long)]
        older_than: Option<String>,

        /// Preview what would be evicted without deleting anything
        #[arg(long)]
        dry_run: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    likeswap::init_logging(cli.verbose.then_some("debug"));

    let settings = ConfigLoader::new()
        .load_config(cli.config.as_deref())
        .context("Failed to load configuration")?;
    let database_url = cli
        .database_url
        .clone()
        .or_else(|| settings.database.url.clone())
        .context("Database URL is required. Set --database-url, DATABASE_URL or [database] url in the config file")?;
    let exchange_config = settings
        .exchange_config()
        .context("Invalid exchange configuration")?;

    let session = Session::open(&database_url, exchange_config).await?;

    match cli.command {
        Commands::Migrate => commands::serve::migrate(&session).await?,
        Commands::Serve => commands::serve::run(session).await?,
        Commands::Register {
            user_id,
            invited_by,
        } => commands::member::register(&session, user_id, invited_by).await?,
        Commands::Submit { user_id, link } => {
            commands::member::submit(&session, user_id, &link).await?
        }
        Commands::Tasks { user_id } => commands::member::tasks(&session, user_id).await?,
        Commands::Confirm { user_id } => commands::member::confirm(&session, user_id).await?,
        Commands::Click { user_id, link } => {
            commands::member::click(&session, user_id, &link).await?
        }
        Commands::Top { limit } => commands::member::top(&session, limit).await?,
        Commands::Admin { command } => match command {
            AdminCommands::Unban { user_id } => commands::admin::unban(&session, user_id).await?,
            AdminCommands::Banned => commands::admin::banned(&session).await?,
            AdminCommands::Items => commands::admin::items(&session).await?,
            AdminCommands::Delete { ids } => commands::admin::delete(&session, ids).await?,
            AdminCommands::Stats => commands::admin::stats(&session).await?,
            AdminCommands::Invites => commands::admin::invites(&session).await?,
            AdminCommands::Evict {
                older_than,
                dry_run,
            } => commands::admin::evict(&session, older_than.as_deref(), dry_run).await?,
        },
    }

    Ok(())
}
