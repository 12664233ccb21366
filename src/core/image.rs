//! # MMS Image Handling
//!
//! Turns a dropped or picked file into a self-contained `data:` URI, the
//! stand-in for a real image upload endpoint.
//!
//! A file's declared media type comes from its extension. Only `image/*`
//! types are accepted; everything else is ignored by the caller.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use std::fmt;
use std::path::Path;

#[derive(Debug)]
pub enum ImageError {
    /// The file does not declare an `image/*` media type.
    NotAnImage(String),
    Io(std::io::Error),
}

impl fmt::Display for ImageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageError::NotAnImage(media_type) => {
                write!(f, "not an image (media type: {media_type})")
            }
            ImageError::Io(e) => write!(f, "image read error: {e}"),
        }
    }
}

impl std::error::Error for ImageError {}

/// Declared media type for a path, from its extension.
pub fn media_type_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        "svg" => "image/svg+xml",
        "ico" => "image/x-icon",
        "tif" | "tiff" => "image/tiff",
        "avif" => "image/avif",
        "heic" => "image/heic",
        "txt" => "text/plain",
        "pdf" => "application/pdf",
        "json" => "application/json",
        "mp4" => "video/mp4",
        _ => "application/octet-stream",
    }
}

pub fn is_image(media_type: &str) -> bool {
    media_type.starts_with("image/")
}

/// Encode bytes as a `data:<media_type>;base64,...` URI.
pub fn to_data_uri(media_type: &str, bytes: &[u8]) -> String {
    format!("data:{media_type};base64,{}", STANDARD.encode(bytes))
}

/// Read an image file and convert it to a data URI.
///
/// No size limit is applied.
pub async fn read_data_uri(path: &Path) -> Result<String, ImageError> {
    let media_type = media_type_for(path);
    if !is_image(media_type) {
        return Err(ImageError::NotAnImage(media_type.to_string()));
    }
    let bytes = tokio::fs::read(path).await.map_err(ImageError::Io)?;
    Ok(to_data_uri(media_type, &bytes))
}

/// Extract the first file path from a terminal drop.
///
/// Terminals deliver dropped files as pasted text: one or more paths,
/// separated by newlines or spaces, sometimes quoted and sometimes with
/// backslash-escaped spaces or a `file://` prefix.
pub fn first_dropped_path(pasted: &str) -> Option<String> {
    let trimmed = pasted.trim();
    if trimmed.is_empty() {
        return None;
    }

    let first = if let Some(rest) = trimmed.strip_prefix('\'') {
        rest.split('\'').next().unwrap_or(rest).to_string()
    } else if let Some(rest) = trimmed.strip_prefix('"') {
        rest.split('"').next().unwrap_or(rest).to_string()
    } else {
        let line = trimmed.lines().next().unwrap_or(trimmed);
        // Walk until an unescaped space
        let mut out = String::new();
        let mut chars = line.chars();
        while let Some(c) = chars.next() {
            match c {
                '\\' => {
                    if let Some(next) = chars.next() {
                        out.push(next);
                    }
                }
                ' ' => break,
                _ => out.push(c),
            }
        }
        out
    };

    let path = first.strip_prefix("file://").unwrap_or(&first).to_string();
    (!path.is_empty()).then_some(path)
}

/// Short human-readable description of an image reference for the preview.
pub fn describe_reference(reference: &str) -> String {
    if let Some(rest) = reference.strip_prefix("data:") {
        let media_type = rest.split(';').next().unwrap_or("image");
        let payload = rest.split_once(',').map(|(_, p)| p.len()).unwrap_or(0);
        // base64 expands 3 bytes into 4 chars
        let kb = (payload * 3 / 4).div_ceil(1024);
        format!("{media_type} ({kb} KB)")
    } else {
        reference.to_string()
    }
}
