use clap::Subcommand;
use serde_json::json;

use crate::cli::output::output_fields;
use crate::cli::OutputFormat;
use crate::state::AppState;

#[derive(Subcommand)]
pub enum TokenCommands {
    #[command(about = "Mint a bearer token for an existing user")]
    Issue {
        #[arg(long, help = "Email of the user")]
        email: String,
    },

    #[command(about = "Check a token and print its subject")]
    Verify {
        #[arg(help = "Bearer token")]
        token: String,
    },
}

pub async fn handle(cmd: TokenCommands, state: &AppState, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        TokenCommands::Issue { email } => {
            let user = state
                .users
                .find_by_email(&email.trim().to_lowercase())
                .await?
                .ok_or_else(|| anyhow::anyhow!("No user with email {}", email))?;
            let token = state.tokens.issue(user.id)?;

            output_fields(
                output_format,
                &[("user", user.id.to_string()), ("token", token.clone())],
                json!({ "user": user.id, "token": token }),
            )
        }
        TokenCommands::Verify { token } => {
            let user_id = state.tokens.verify(&token)?;
            let exists = state.users.find_by_id(user_id).await?.is_some();

            output_fields(
                output_format,
                &[("subject", user_id.to_string()), ("user exists", exists.to_string())],
                json!({ "subject": user_id, "userExists": exists }),
            )
        }
    }
}
