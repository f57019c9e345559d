//! Items command - lists the flattened items of a snapshot.

use ydot::Item;
use ydot::view::{escape, format_content, id_text, parent_label};

use crate::cli::ItemsArgs;
use crate::output::{OutputFormat, print_table};

fn label(item: &Item) -> String {
    escape(&format_content(
        item.content.as_ref(),
        item.parent_sub.as_deref(),
    ))
}

/// Run the items command
pub async fn run(args: &ItemsArgs, format: OutputFormat) -> Result<(), Box<dyn std::error::Error>> {
    let snapshot = super::load_snapshot(&args.snapshot).await?;

    match format {
        OutputFormat::Human => {
            if snapshot.store().is_empty() {
                println!("No items found.");
                return Ok(());
            }

            let rows: Vec<Vec<String>> = snapshot
                .items()
                .map(|item| {
                    vec![
                        item.id.to_string(),
                        label(item),
                        item.length.to_string(),
                        item.deleted.to_string(),
                        id_text(item.left.as_ref()),
                        id_text(item.right.as_ref()),
                        parent_label(item.parent.as_ref()),
                    ]
                })
                .collect();
            print_table(
                &["ID", "CONTENT", "LEN", "DELETED", "LEFT", "RIGHT", "PARENT"],
                &rows,
            );
        }
        OutputFormat::Json => {
            for item in snapshot.items() {
                let value = serde_json::json!({
                    "id": item.id.to_string(),
                    "content": label(item),
                    "length": item.length,
                    "deleted": item.deleted,
                    "left": item.left.map(|id| id.to_string()),
                    "right": item.right.map(|id| id.to_string()),
                    "origin": item.origin.map(|id| id.to_string()),
                    "right_origin": item.right_origin.map(|id| id.to_string()),
                    "parent": item.parent.as_ref().map(|p| parent_label(Some(p))),
                    "parent_sub": item.parent_sub,
                });
                println!("{}", serde_json::to_string(&value)?);
            }
        }
    }

    Ok(())
}
