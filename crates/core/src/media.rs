//! Media URL extraction, storage key naming, and content-type helpers.

use serde_json::Value;

// ---------------------------------------------------------------------------
// Result payload parsing
// ---------------------------------------------------------------------------

/// Object keys that may wrap a media URL, in lookup order.
const MEDIA_WRAPPER_KEYS: &[&str] = &["video", "image", "audio", "output", "images", "videos"];

/// Extract a media URL from a provider result payload.
///
/// Providers disagree on where the URL lives. Accepted shapes:
///
/// - a bare string: `"https://..."`
/// - `{ "url": "https://..." }`
/// - `{ "video": { "url": ... } }` (also `image`, `audio`)
/// - `{ "output": <any of these> }` and `{ "images": [ ... ] }`
/// - an array, whose first element is any of these
///
/// Only strings that look like URLs (`http(s)://` or `data:`) are returned.
pub fn extract_media_url(payload: &Value) -> Option<String> {
    match payload {
        Value::String(s) if is_url_like(s) => Some(s.clone()),
        Value::Array(items) => items.first().and_then(extract_media_url),
        Value::Object(map) => {
            if let Some(url) = map.get("url").and_then(extract_media_url) {
                return Some(url);
            }
            MEDIA_WRAPPER_KEYS
                .iter()
                .filter_map(|k| map.get(*k))
                .find_map(extract_media_url)
        }
        _ => None,
    }
}

fn is_url_like(s: &str) -> bool {
    s.starts_with("https://") || s.starts_with("http://") || s.starts_with("data:")
}

// ---------------------------------------------------------------------------
// Storage naming
// ---------------------------------------------------------------------------

/// Turn `provider` + `model` into a single path-safe label.
///
/// Lowercases and collapses every run of non-alphanumeric characters to a
/// single `-`, so `fal` + `fal-ai/ltx-video` becomes `fal-fal-ai-ltx-video`.
pub fn storage_label(provider: &str, model: &str) -> String {
    let raw = format!("{provider}-{model}").to_lowercase();
    let mut label = String::with_capacity(raw.len());
    let mut pending_dash = false;
    for c in raw.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !label.is_empty() {
                label.push('-');
            }
            pending_dash = false;
            label.push(c);
        } else {
            pending_dash = true;
        }
    }
    label
}

/// Build an object key `<folder>/<provider-model>/<id>.<ext>`.
pub fn storage_key(folder: &str, provider: &str, model: &str, id: uuid::Uuid, ext: &str) -> String {
    format!("{folder}/{}/{id}.{ext}", storage_label(provider, model))
}

// ---------------------------------------------------------------------------
// Content types
// ---------------------------------------------------------------------------

/// MIME type for a file extension. Unknown extensions map to octet-stream.
pub fn content_type_for_extension(ext: &str) -> &'static str {
    match ext.to_ascii_lowercase().as_str() {
        "mp4" => "video/mp4",
        "webm" => "video/webm",
        "mov" => "video/quicktime",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "webp" => "image/webp",
        "mp3" => "audio/mpeg",
        "wav" => "audio/wav",
        "ogg" => "audio/ogg",
        _ => "application/octet-stream",
    }
}

/// Pick the content type for a downloaded artifact.
///
/// A response header naming a media type wins; generic types such as
/// `application/octet-stream` or `binary/octet-stream` fall back to the
/// extension.
pub fn resolve_content_type(header: Option<&str>, ext: &str) -> String {
    if let Some(h) = header {
        let essence = h.split(';').next().unwrap_or("").trim().to_ascii_lowercase();
        if ["video/", "image/", "audio/"]
            .iter()
            .any(|prefix| essence.starts_with(prefix))
        {
            return essence;
        }
    }
    content_type_for_extension(ext).to_string()
}

/// File extension of a media URL's last path segment, if it is a known
/// media type. Query strings and fragments are ignored.
pub fn extension_from_url(url: &str) -> Option<String> {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    let segment = path.rsplit('/').next()?;
    let (_, ext) = segment.rsplit_once('.')?;
    let ext = ext.to_ascii_lowercase();
    (content_type_for_extension(&ext) != "application/octet-stream").then_some(ext)
}

/// Build a `data:` URI from an already base64-encoded payload.
pub fn data_uri(content_type: &str, base64_payload: &str) -> String {
    format!("data:{content_type};base64,{base64_payload}")
}

/// Split a `data:<type>;base64,<payload>` URI into `(content_type, payload)`.
///
/// Returns `None` for anything that is not a base64 data URI.
pub fn parse_data_uri(uri: &str) -> Option<(&str, &str)> {
    let rest = uri.strip_prefix("data:")?;
    let (meta, payload) = rest.split_once(',')?;
    let content_type = meta.strip_suffix(";base64")?;
    Some((content_type, payload))
}
