//! In-place editing of container payloads.
//!
//! Every write keeps the file's own header and re-encodes the payload, so the
//! length fields always match the new JSON text.

use std::path::Path;

use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::container::encode;
use crate::files::{self, BatchReport, ToolError};
use crate::header::{Header, HeaderLayout};
use crate::record::collapse_integral_floats;

pub type JsonObject = Map<String, Value>;

/// Configuration for the editing tools.
#[derive(Debug, Clone, Copy)]
pub struct EditOptions {
    pub layout: HeaderLayout,
    /// Print floats without a fractional part as integers (`3.0` → `3`).
    pub integral_floats: bool,
}

impl Default for EditOptions {
    fn default() -> Self {
        Self { layout: HeaderLayout::default(), integral_floats: true }
    }
}

/// Pretty-print a payload the way the game data is laid out.
pub fn format_json(object: JsonObject, options: &EditOptions) -> Result<String, serde_json::Error> {
    let mut value = Value::Object(object);
    if options.integral_floats {
        collapse_integral_floats(&mut value);
    }
    serde_json::to_string_pretty(&value)
}

/// Replace the payload of `path` with `json`, keeping the file's header.
pub fn write_json(path: &Path, json: &str, layout: HeaderLayout) -> Result<(), ToolError> {
    let bytes = files::read(path)?;
    let header = Header::from_bytes(&bytes).map_err(|e| ToolError::container(path, e))?;
    let encoded = encode(&header, json, layout).map_err(|e| ToolError::container(path, e))?;
    files::write(path, &encoded)?;
    debug!(path = %path.display(), len = encoded.len(), "payload written");
    Ok(())
}

/// Decode `path`, run `transform` over its payload object and write it back.
/// Returns `false` without touching the file when it is not a container.
pub fn edit_file<F>(path: &Path, options: &EditOptions, transform: F) -> Result<bool, ToolError>
where
    F: FnOnce(JsonObject) -> JsonObject,
{
    let Some(container) = files::load_container(path)? else {
        return Ok(false);
    };
    let object = match serde_json::from_str::<Value>(&container.json)? {
        Value::Object(map) => map,
        _ => return Err(ToolError::NotAnObject(path.to_owned())),
    };
    let json = format_json(transform(object), options)?;
    let encoded = encode(&container.header, &json, options.layout)
        .map_err(|e| ToolError::container(path, e))?;
    files::write(path, &encoded)?;
    debug!(path = %path.display(), "payload edited");
    Ok(true)
}

/// [`edit_file`] over every regular file in `dir`.
pub fn edit_dir<F>(dir: &Path, options: &EditOptions, mut transform: F) -> Result<BatchReport, ToolError>
where
    F: FnMut(JsonObject) -> JsonObject,
{
    let mut report = BatchReport::default();
    for path in files::list_files(dir)? {
        match edit_file(&path, options, &mut transform) {
            Ok(true)  => report.processed += 1,
            Ok(false) => report.skipped += 1,
            Err(e) => {
                warn!("not edited: {e}");
                report.failures.push(e);
            }
        }
    }
    Ok(report)
}
