use serde_json::{json, Value};

use crate::api::BlogView;
use crate::cli::OutputFormat;

/// Characters of content shown in list views before truncation
pub const PREVIEW_CHARS: usize = 150;

/// Output a success message in the appropriate format
pub fn output_success(
    output_format: &OutputFormat,
    message: &str,
    data: Option<Value>,
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "success": true,
                "message": message
            });

            if let (Some(target), Some(Value::Object(extra))) = (response.as_object_mut(), data) {
                target.extend(extra);
            }

            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            println!("✓ {}", message);
        }
    }
    Ok(())
}

/// Output an empty collection in the appropriate format
pub fn output_empty_collection(
    output_format: &OutputFormat,
    collection_name: &str,
    message: &str,
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&json!({
                collection_name: []
            }))?);
        }
        OutputFormat::Text => {
            println!("{}", message);
        }
    }
    Ok(())
}

/// Output current item information in the appropriate format
pub fn output_current_item(
    output_format: &OutputFormat,
    item_type: &str,
    name: &str,
    details: Value,
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&json!({
                format!("current_{}", item_type): details
            }))?);
        }
        OutputFormat::Text => {
            println!("Current {}: {}", item_type, name);
            if let Some(id) = details.get("id").and_then(Value::as_str) {
                println!("ID: {}", id);
            }
        }
    }
    Ok(())
}

/// Output "no current item" message in the appropriate format
pub fn output_no_current_item(
    output_format: &OutputFormat,
    item_type: &str,
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&json!({
                format!("current_{}", item_type): null
            }))?);
        }
        OutputFormat::Text => {
            println!("No current {} (not logged in)", item_type);
        }
    }
    Ok(())
}

/// List view: title, author, date and a content preview per post
pub fn output_blog_list<F>(
    output_format: &OutputFormat,
    blogs: &[BlogView],
    can_edit: F,
) -> anyhow::Result<()>
where
    F: Fn(&BlogView) -> bool,
{
    if blogs.is_empty() {
        return output_empty_collection(output_format, "blogs", "No blogs yet.");
    }

    match output_format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&json!({ "blogs": blogs }))?);
        }
        OutputFormat::Text => {
            for blog in blogs {
                println!("{}{}", blog.title, editable_marker(can_edit(blog)));
                println!("  {}", byline(blog));
                println!("  {}", preview(&blog.content));
                println!("  id: {}", blog.id);
                println!();
            }
        }
    }
    Ok(())
}

/// Detail view with the full content
pub fn output_blog(
    output_format: &OutputFormat,
    blog: &BlogView,
    editable: bool,
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&json!({ "blog": blog }))?);
        }
        OutputFormat::Text => {
            println!("{}{}", blog.title, editable_marker(editable));
            println!("{}", byline(blog));
            if blog.updated_at != blog.created_at {
                println!("Updated {}", blog.updated_at.format("%B %-d, %Y"));
            }
            println!();
            println!("{}", blog.content);
        }
    }
    Ok(())
}

/// First [`PREVIEW_CHARS`] characters of `content`, with "..." when cut
pub fn preview(content: &str) -> String {
    let mut chars = content.chars();
    let head: String = chars.by_ref().take(PREVIEW_CHARS).collect();
    if chars.next().is_some() {
        format!("{}...", head)
    } else {
        head
    }
}

fn byline(blog: &BlogView) -> String {
    format!(
        "By {} on {}",
        blog.author.email,
        blog.created_at.format("%B %-d, %Y")
    )
}

fn editable_marker(editable: bool) -> &'static str {
    if editable {
        "  [editable]"
    } else {
        ""
    }
}
