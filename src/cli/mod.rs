pub mod commands;
pub mod utils;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

use crate::client::{ApiClient, BlogClient, SessionFile};

#[derive(Parser)]
#[command(name = "blog")]
#[command(about = "Blog CLI - command-line client for the mini blogging platform")]
#[command(version)]
pub struct Cli {
    #[arg(
        long,
        global = true,
        env = "BLOG_API_URL",
        default_value = "http://localhost:5000",
        help = "Server root URL"
    )]
    pub server: String,

    #[arg(long, global = true, help = "Output in human-readable text format")]
    pub text: bool,

    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Registration, login and session management")]
    Auth {
        #[command(subcommand)]
        cmd: commands::auth::AuthCommands,
    },

    #[command(about = "Read and write blog posts")]
    Post {
        #[command(subcommand)]
        cmd: commands::post::PostCommands,
    },

    #[command(about = "Server status")]
    Server {
        #[command(subcommand)]
        cmd: commands::server::ServerCommands,
    },
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
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

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);

    let api = ApiClient::new(&cli.server)?;
    let mut client = BlogClient::with_session_file(api, SessionFile::default_location()?)?;

    match cli.command {
        Commands::Auth { cmd } => commands::auth::handle(cmd, &mut client, output_format).await,
        Commands::Post { cmd } => commands::post::handle(cmd, &mut client, output_format).await,
        Commands::Server { cmd } => commands::server::handle(cmd, &client, output_format).await,
    }
}
