//! Render command - prints the item graph in dot format.

use tokio::io::AsyncWriteExt;

use crate::cli::RenderArgs;

/// Run the render command
pub async fn run(args: &RenderArgs) -> Result<(), Box<dyn std::error::Error>> {
    let snapshot = super::load_snapshot(&args.snapshot).await?;
    let graph = snapshot.render();

    match &args.output {
        Some(path) => {
            tokio::fs::write(path, graph.as_bytes()).await?;
            tracing::info!("Wrote graph to {}", path.display());
        }
        None => {
            let mut stdout = tokio::io::stdout();
            stdout.write_all(graph.as_bytes()).await?;
            stdout.flush().await?;
        }
    }

    Ok(())
}
