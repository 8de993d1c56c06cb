use anyhow::Context;
use clap::Subcommand;
use serde_json::json;
use uuid::Uuid;

use crate::auth::TokenService;
use crate::cli::OutputFormat;
use crate::config::AppConfig;

#[derive(Subcommand)]
pub enum TokenCommands {
    #[command(about = "Sign a token for an existing user id")]
    Issue {
        #[arg(help = "User id (UUID)")]
        user_id: Uuid,
    },

    #[command(about = "Check a token against the current and previous signing keys")]
    Verify {
        #[arg(help = "Token as sent in the auth-token header")]
        token: String,
    },
}

pub fn handle(cmd: TokenCommands, config: &AppConfig, output_format: OutputFormat) -> anyhow::Result<()> {
    let tokens = TokenService::from_config(&config.security).context("JWT_SECRET must be set")?;

    match cmd {
        TokenCommands::Issue { user_id } => {
            let token = tokens.issue(user_id)?;
            match output_format {
                OutputFormat::Json => println!("{}", json!({ "user_id": user_id, "token": token })),
                OutputFormat::Text => println!("{}", token),
            }
            Ok(())
        }
        TokenCommands::Verify { token } => {
            let user_id = tokens.verify(&token).context("token rejected")?;
            match output_format {
                OutputFormat::Json => println!("{}", json!({ "valid": true, "user_id": user_id })),
                OutputFormat::Text => println!("valid for user {}", user_id),
            }
            Ok(())
        }
    }
}
