use clap::Subcommand;
use serde_json::json;
use uuid::Uuid;

use crate::cli::utils::{output_blog, output_blog_list, output_success};
use crate::cli::OutputFormat;
use crate::client::BlogClient;

#[derive(Subcommand)]
pub enum PostCommands {
    #[command(about = "List all posts, newest first")]
    List {
        #[arg(long, help = "Only posts you can edit")]
        mine: bool,
    },

    #[command(about = "Show one post in full")]
    Show {
        #[arg(help = "Post ID")]
        id: Uuid,
    },

    #[command(about = "Publish a new post")]
    Create {
        #[arg(long, help = "Post title")]
        title: String,
        #[arg(long, help = "Post content")]
        content: String,
    },

    #[command(about = "Edit one of your posts")]
    Update {
        #[arg(help = "Post ID")]
        id: Uuid,
        #[arg(long, help = "New title")]
        title: Option<String>,
        #[arg(long, help = "New content")]
        content: Option<String>,
    },

    #[command(about = "Delete one of your posts")]
    Delete {
        #[arg(help = "Post ID")]
        id: Uuid,
    },
}

pub async fn handle(
    cmd: PostCommands,
    client: &mut BlogClient,
    output_format: OutputFormat,
) -> anyhow::Result<()> {
    match cmd {
        PostCommands::List { mine } => {
            client.refresh_blogs().await?;
            let blogs: Vec<_> = client
                .state()
                .blogs()
                .iter()
                .filter(|blog| !mine || client.can_edit(blog))
                .cloned()
                .collect();
            output_blog_list(&output_format, &blogs, |blog| client.can_edit(blog))
        }
        PostCommands::Show { id } => {
            let blog = client.show(id).await?;
            output_blog(&output_format, &blog, client.can_edit(&blog))
        }
        PostCommands::Create { title, content } => {
            let blog = client.create(&title, &content).await?;
            output_success(
                &output_format,
                &format!("Created post {}", blog.id),
                Some(json!({ "blog": blog })),
            )
        }
        PostCommands::Update { id, title, content } => {
            if title.is_none() && content.is_none() {
                anyhow::bail!("Nothing to update: pass --title and/or --content");
            }
            let blog = client.update(id, title, content).await?;
            output_success(
                &output_format,
                &format!("Updated post {}", blog.id),
                Some(json!({ "blog": blog })),
            )
        }
        PostCommands::Delete { id } => {
            client.delete(id).await?;
            output_success(&output_format, &format!("Deleted post {}", id), None)
        }
    }
}
