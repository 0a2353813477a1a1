use crate::error::{AdGenError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone)]
pub struct UploadRequest {
    pub bytes: Vec<u8>,
    pub file_name: String,
    pub folder: String,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadResult {
    pub url: String,
    pub file_id: String,
    pub name: String,
    pub thumbnail_url: Option<String>,
}

fn string_field(object: &Value, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| object.get(*key))
        .filter_map(Value::as_str)
        .map(str::trim)
        .find(|s| !s.is_empty())
        .map(str::to_string)
}

fn nested_metadata(response: &Value) -> Option<&Value> {
    response
        .get("responseMetadata")
        .or_else(|| response.get("response_metadata"))
        .and_then(|meta| meta.get("raw"))
        .filter(|raw| raw.is_object())
}

fn lookup_field(response: &Value, nested: Option<&Value>, keys: &[&str]) -> Option<String> {
    string_field(response, keys).or_else(|| nested.and_then(|raw| string_field(raw, keys)))
}

impl UploadResult {
    /// Normalizes an upload response that carries its attributes either flat
    /// on the top-level object or nested under `responseMetadata.raw`.
    /// Flat attributes take precedence field by field.
    pub fn from_response(response: &Value, requested_name: &str) -> Result<Self> {
        let nested = nested_metadata(response);
        let lookup = |keys: &[&str]| lookup_field(response, nested, keys);

        let url = lookup(&["url"][..]).ok_or_else(|| {
            AdGenError::UploadError(format!(
                "No URL found in upload response: {}",
                response
            ))
        })?;

        Ok(UploadResult {
            url,
            file_id: lookup(&["fileId", "file_id"][..]).unwrap_or_default(),
            name: lookup(&["name"][..]).unwrap_or_else(|| requested_name.to_string()),
            thumbnail_url: lookup(&["thumbnailUrl", "thumbnail_url", "thumbnail"][..]),
        })
    }
}
