pub mod offline;
pub mod run;

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

use fairplay::config::Config;
use fairplay::models::PlaylistItem;

// Re-export command functions for convenience
pub use offline::{plan, simulate};
pub use run::run;

/// Playlist snapshot file read by the offline commands
#[derive(Debug, Deserialize)]
struct SnapshotFile {
    items: Vec<PlaylistItem>,
}

/// Load configuration from a TOML file, or from the environment when no file is given
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    let config = match path {
        Some(path) => Config::from_file(path)?,
        None => Config::from_env()?,
    };
    config.validate().context("Invalid configuration")?;
    Ok(config)
}

/// Read the playlist rows of a snapshot JSON file
fn load_snapshot(path: &Path) -> Result<Vec<PlaylistItem>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read snapshot file: {}", path.display()))?;
    let snapshot: SnapshotFile = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse snapshot file: {}", path.display()))?;
    Ok(snapshot.items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_snapshot() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{ "items": [
                {{ "track_id": "A1", "added_by": "a" }},
                {{ "track_id": "B1", "added_by": "b" }}
            ] }}"#
        )
        .unwrap();

        let items = load_snapshot(file.path()).unwrap();
        assert_eq!(items, vec![PlaylistItem::new("A1", "a"), PlaylistItem::new("B1", "b")]);
    }

    #[test]
    fn test_load_snapshot_rejects_bad_json() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{{ \"tracks\": [] }}").unwrap();
        assert!(load_snapshot(file.path()).is_err());
    }
}
