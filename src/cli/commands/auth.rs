use clap::Subcommand;
use serde_json::json;

use crate::cli::utils::{output_current_item, output_no_current_item, output_success};
use crate::cli::OutputFormat;
use crate::client::BlogClient;

#[derive(Subcommand)]
pub enum AuthCommands {
    #[command(about = "Register new user")]
    Register {
        #[arg(help = "Email")]
        email: String,
        #[arg(long, env = "BLOG_PASSWORD", hide_env_values = true, help = "Password")]
        password: Option<String>,
    },

    #[command(about = "Login and store the session")]
    Login {
        #[arg(help = "Email")]
        email: String,
        #[arg(long, env = "BLOG_PASSWORD", hide_env_values = true, help = "Password")]
        password: Option<String>,
    },

    #[command(about = "Discard the stored session")]
    Logout,

    #[command(about = "Show the stored session")]
    Status,

    #[command(about = "Ask the server who the stored token belongs to")]
    Whoami,
}

pub async fn handle(
    cmd: AuthCommands,
    client: &mut BlogClient,
    output_format: OutputFormat,
) -> anyhow::Result<()> {
    match cmd {
        AuthCommands::Register { email, password } => {
            let password = require_password(password)?;
            let user = client.register(&email, &password).await?;
            output_success(
                &output_format,
                &format!("Registered {}", user.email),
                Some(json!({ "user": user })),
            )
        }
        AuthCommands::Login { email, password } => {
            let password = require_password(password)?;
            let response = client.login(&email, &password).await?;
            output_success(
                &output_format,
                &format!("Logged in as {}", response.user.email),
                Some(json!({ "user": response.user })),
            )
        }
        AuthCommands::Logout => {
            client.logout()?;
            output_success(&output_format, "Logged out", None)
        }
        AuthCommands::Status => match client.state().session() {
            Some(session) => output_current_item(
                &output_format,
                "user",
                &session.user.email,
                json!({ "id": session.user.id, "email": session.user.email }),
            ),
            None => output_no_current_item(&output_format, "user"),
        },
        AuthCommands::Whoami => {
            let principal = client.whoami().await?;
            output_current_item(
                &output_format,
                "user",
                &principal.email,
                json!({ "id": principal.id, "email": principal.email }),
            )
        }
    }
}

fn require_password(password: Option<String>) -> anyhow::Result<String> {
    password
        .filter(|p| !p.is_empty())
        .ok_or_else(|| anyhow::anyhow!("Password required: pass --password or set BLOG_PASSWORD"))
}
