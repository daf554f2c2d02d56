//! JSON file helpers shared by the loader and the tools.
//!
//! - `read_json_file`: read and deserialize a JSON document.
//! - `write_json_file`: pretty-print a serializable value to disk.
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Read `path` and deserialize it as JSON.
pub fn read_json_file<T: DeserializeOwned>(path: &Path) -> Result<T, String> {
    let data = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read {}: {e}", path.display()))?;
    serde_json::from_str(&data).map_err(|e| format!("Failed to parse {}: {e}", path.display()))
}

/// Serialize a value as pretty JSON to `path`, creating parent directories.
pub fn write_json_file<T: Serialize>(path: &Path, value: &T) -> Result<(), String> {
    ensure_parent_dir(path)?;
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| format!("Failed to serialize JSON for {}: {e}", path.display()))?;
    fs::write(path, json).map_err(|e| format!("Failed to write JSON {}: {e}", path.display()))
}

fn ensure_parent_dir(path: &Path) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create {}: {e}", parent.display()))?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn write_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/deeper/out.json");
        let mut value = BTreeMap::new();
        value.insert("distance".to_string(), 1.5f64);
        write_json_file(&path, &value).unwrap();

        let back: BTreeMap<String, f64> = read_json_file(&path).unwrap();
        assert_eq!(back, value);
    }

    #[test]
    fn read_reports_path_on_parse_failure() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, "{ not json").unwrap();
        let err = read_json_file::<BTreeMap<String, f64>>(&path).unwrap_err();
        assert!(err.starts_with("Failed to parse"), "{err}");
        assert!(err.contains("broken.json"), "{err}");
    }
}
