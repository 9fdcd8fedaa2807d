pub mod file;
pub mod stdin;

use serde::de::DeserializeOwned;

/// Typed input from `--input FILE`, else from piped stdin, else `None` so
/// the caller can fall back to individual flags.
pub fn read_input<T: DeserializeOwned>(
    path: Option<&str>,
) -> Result<Option<T>, Box<dyn std::error::Error>> {
    if let Some(path) = path {
        return Ok(Some(file::read_document(path)?));
    }
    stdin::read_stdin()
}
