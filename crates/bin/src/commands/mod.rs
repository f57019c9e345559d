pub mod items;
pub mod render;

use ydot::Snapshot;

use crate::cli::SnapshotArgs;

/// Reads and loads the snapshot named on the command line.
pub async fn load_snapshot(args: &SnapshotArgs) -> Result<Snapshot, Box<dyn std::error::Error>> {
    let data = tokio::fs::read(&args.path)
        .await
        .map_err(|e| format!("Failed to read {}: {e}", args.path.display()))?;
    tracing::debug!(bytes = data.len(), "Read snapshot file");
    Ok(Snapshot::load(&data, args.encoding.into())?)
}
