//! Command handlers for the slotsense CLI
//!
//! Each subcommand has its own module with handler functions.

pub mod configure;
pub mod count;
pub mod discover;
pub mod probe;
pub mod replay;

use anyhow::{Context, Result};
use slotsense::SnapshotGraph;
use std::path::Path;

/// Load a snapshot file into a graph
pub fn load_graph(path: &Path) -> Result<SnapshotGraph> {
    SnapshotGraph::load(path).with_context(|| format!("Failed to load snapshot {}", path.display()))
}

#[cfg(test)]
pub(crate) mod fixtures {
    use std::fs;
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    /// Sample snapshot shipped under `share/snapshots`
    pub fn sample(name: &str) -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("../../share/snapshots")
            .join(name)
    }

    /// Open inventory with a backpack icon and three slots, two of them filled
    pub const OPEN: &str = r#"
objects:
  - { id: 1, type: Canvas, rect: { x: 0, y: 0, width: 1920, height: 1080 } }
  - { id: 2, type: Image, name: BackpackIcon, parent: 1, rect: { x: 40, y: 40, width: 64, height: 64 }, visual: { resource: ui_backpack } }
  - { id: 3, type: InventoryUIItem, parent: 1, attributes: { amount: 2 } }
  - { id: 4, type: InventoryUIItem, parent: 1, attributes: { amount: 0 } }
  - { id: 5, type: InventoryUIItem, parent: 1, attributes: { amount: 1 } }
"#;

    pub const CLOSED: &str = r#"
objects:
  - { id: 1, type: Canvas, rect: { x: 0, y: 0, width: 1920, height: 1080 } }
  - { id: 2, type: HealthBar, parent: 1 }
"#;

    pub fn write(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, contents).unwrap();
        path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_graph_reports_path() {
        let err = load_graph(Path::new("/nonexistent/frame.yaml")).unwrap_err();
        assert!(format!("{err:#}").contains("frame.yaml"));
    }

    #[test]
    fn test_load_graph() {
        let dir = tempfile::tempdir().unwrap();
        let path = fixtures::write(&dir, "open.yaml", fixtures::OPEN);
        assert_eq!(load_graph(&path).unwrap().len(), 5);
    }
}
