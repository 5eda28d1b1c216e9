use clap::Subcommand;

use crate::cli::utils::output_success;
use crate::cli::OutputFormat;
use crate::client::BlogClient;

#[derive(Subcommand)]
pub enum ServerCommands {
    #[command(about = "Check server health status from API /health endpoint")]
    Health,
}

pub async fn handle(
    cmd: ServerCommands,
    client: &BlogClient,
    output_format: OutputFormat,
) -> anyhow::Result<()> {
    match cmd {
        ServerCommands::Health => {
            let body = client.api().health().await?;
            output_success(
                &output_format,
                &format!("{} is up", client.api().base_url()),
                Some(body),
            )
        }
    }
}
