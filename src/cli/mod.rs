pub mod utils;

use std::sync::Arc;

use clap::{Parser, Subcommand};
use serde_json::json;

use crate::auth::{hash_password, TokenService};
use crate::config::AppConfig;
use crate::database::{DatabaseManager, PgUserDao};
use crate::services::UserProvider;
use utils::output_success;

#[derive(Parser)]
#[command(name = "gram")]
#[command(about = "gram - administration tool for the gram-api backend")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Create missing tables and indexes in DATABASE_URL")]
    Migrate,

    #[command(about = "Issue an access token for an existing user")]
    IssueToken {
        #[arg(help = "User id the token is issued to")]
        user_idx: i64,
    },

    #[command(about = "Hash a password the way registration stores it")]
    HashPassword {
        #[arg(help = "Plaintext password")]
        password: String,
    },

    #[command(about = "Check that the database is reachable")]
    Health,
}

#[derive(Debug, Clone, Copy)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

pub async fn run(cli: Cli, config: &AppConfig) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);

    match cli.command {
        Commands::Migrate => {
            let pool = DatabaseManager::connect(&config.database).await?;
            DatabaseManager::migrate(&pool).await?;
            output_success(output_format, "Schema applied", None)
        }
        Commands::IssueToken { user_idx } => {
            let tokens = TokenService::from_config(&config.security)?;
            let pool = DatabaseManager::connect(&config.database).await?;
            let user = UserProvider::new(Arc::new(PgUserDao::new(pool)), tokens.clone())
                .user_by_idx(user_idx)
                .await
                .map_err(|e| anyhow::anyhow!("user {}: {}", user_idx, e.message()))?;

            let token = tokens.issue(user.user_idx)?;
            output_success(
                output_format,
                &token,
                Some(json!({ "userIdx": user.user_idx, "nickName": user.nick_name, "jwt": token })),
            )
        }
        Commands::HashPassword { password } => {
            let hash = hash_password(&password)?;
            output_success(output_format, &hash, Some(json!({ "hash": hash })))
        }
        Commands::Health => {
            let pool = DatabaseManager::connect(&config.database).await?;
            DatabaseManager::health_check(&pool).await?;
            output_success(output_format, "Database is reachable", None)
        }
    }
}
