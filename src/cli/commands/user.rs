use clap::Subcommand;
use serde_json::json;

use crate::auth::Registration;
use crate::cli::output::output_fields;
use crate::cli::OutputFormat;
use crate::state::AppState;

#[derive(Subcommand)]
pub enum UserCommands {
    #[command(about = "Create a user account")]
    Create {
        #[arg(long, help = "Username (at least 3 characters)")]
        username: String,
        #[arg(long, help = "Email address")]
        email: String,
        #[arg(long, help = "Password (at least 6 characters)")]
        password: String,
    },

    #[command(about = "Show a user by email")]
    Show {
        #[arg(long, help = "Email address")]
        email: String,
    },
}

pub async fn handle(cmd: UserCommands, state: &AppState, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        UserCommands::Create { username, email, password } => {
            let user = state
                .credentials
                .create(Registration {
                    username: Some(username),
                    email: Some(email),
                    password: Some(password),
                })
                .await?;

            output_fields(
                output_format,
                &[("id", user.id.to_string()), ("username", user.username.clone()), ("email", user.email.clone())],
                json!({ "user": user.summary() }),
            )
        }
        UserCommands::Show { email } => {
            let user = state
                .users
                .find_by_email(&email.trim().to_lowercase())
                .await?
                .ok_or_else(|| anyhow::anyhow!("No user with email {}", email))?;

            output_fields(
                output_format,
                &[
                    ("id", user.id.to_string()),
                    ("username", user.username.clone()),
                    ("email", user.email.clone()),
                    ("playlists", user.playlists.len().to_string()),
                    ("liked songs", user.liked_songs.len().to_string()),
                    ("created", user.created_at.to_rfc3339()),
                ],
                json!({ "user": user }),
            )
        }
    }
}
