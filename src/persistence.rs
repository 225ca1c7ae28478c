/*!
 * Writing parse results as JSON files.
 *
 * Output is UTF-8, pretty-printed with a two-space indent, with non-ASCII
 * characters written as-is. Files are replaced atomically through a temporary
 * file in the target directory.
 */

use std::fs;
use std::io::Write;
use std::path::Path;

use log::{debug, error};
use serde::Serialize;
use serde_json::Value;
use serde_json::ser::PrettyFormatter;
use tempfile::NamedTempFile;

use crate::errors::PersistenceError;

/// Indentation used for every persisted file
const INDENT: &[u8] = b"  ";

/// Render `mapping` exactly as it is written to disk
pub fn to_pretty_json(mapping: &Value) -> Result<String, serde_json::Error> {
    let mut buffer = Vec::new();
    let formatter = PrettyFormatter::with_indent(INDENT);
    let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
    mapping.serialize(&mut serializer)?;
    buffer.push(b'\n');
    // serde_json only emits valid UTF-8
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}

/// Write `mapping` to `path`, creating parent directories as needed
pub fn screenplay_to_json<P: AsRef<Path>>(mapping: &Value, path: P) -> Result<(), PersistenceError> {
    let path = path.as_ref();
    write_json(mapping, path).inspect_err(|e| error!("Failed to write result: {}", e))?;
    debug!("Wrote result to {:?}", path);
    Ok(())
}

fn write_json(mapping: &Value, path: &Path) -> Result<(), PersistenceError> {
    let io_error = |source: std::io::Error| PersistenceError::Io {
        path: path.to_path_buf(),
        source,
    };

    let json = to_pretty_json(mapping).map_err(|source| PersistenceError::Json {
        path: path.to_path_buf(),
        source,
    })?;

    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent).map_err(io_error)?;

    let mut file = NamedTempFile::new_in(parent).map_err(io_error)?;
    file.write_all(json.as_bytes()).map_err(io_error)?;
    file.flush().map_err(io_error)?;
    file.persist(path).map_err(|e| io_error(e.error))?;
    Ok(())
}

/// Read a mapping previously written by `screenplay_to_json`
pub fn load_json<P: AsRef<Path>>(path: P) -> Result<Value, PersistenceError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|source| PersistenceError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| PersistenceError::Json {
        path: path.to_path_buf(),
        source,
    })
}
