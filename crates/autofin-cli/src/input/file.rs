use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};

/// Read a JSON or YAML file into a typed struct. The format follows the
/// extension: `.yaml`/`.yml` is YAML, anything else JSON.
pub fn read_document<T: DeserializeOwned>(path: &str) -> Result<T, Box<dyn std::error::Error>> {
    let canonical = resolve_path(path)?;
    let contents = fs::read_to_string(&canonical)
        .map_err(|e| format!("Failed to read '{}': {}", canonical.display(), e))?;

    let parse_err = |e: &dyn std::fmt::Display| format!("Failed to parse '{}': {}", canonical.display(), e);
    let value: T = if is_yaml(&canonical) {
        serde_yaml::from_str(&contents).map_err(|e| parse_err(&e))?
    } else {
        serde_json::from_str(&contents).map_err(|e| parse_err(&e))?
    };
    Ok(value)
}

/// Resolve relative paths against the working directory and require an
/// existing regular file.
pub fn resolve_path(path: &str) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let p = Path::new(path);
    let canonical = if p.is_absolute() {
        p.to_path_buf()
    } else {
        std::env::current_dir()?.join(p)
    };

    if !canonical.exists() {
        return Err(format!("File not found: {}", canonical.display()).into());
    }
    if !canonical.is_file() {
        return Err(format!("Not a file: {}", canonical.display()).into());
    }

    Ok(canonical)
}

fn is_yaml(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    )
}
