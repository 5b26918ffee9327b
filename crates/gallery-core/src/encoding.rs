//! Byte and reference encodings used by the environment strategies

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};

/// Path prefix the webview server uses to expose device-local files
pub const FILE_SERVER_PREFIX: &str = "/_capacitor_file_";

const FILE_SCHEME: &str = "file://";

/// Encodes raw bytes as standard padded base64 text
pub fn to_base64(data: &[u8]) -> String {
    BASE64.encode(data)
}

/// Leading bytes of the raster formats a camera or import can produce
const IMAGE_SIGNATURES: &[&[u8]] = &[
    &[0xFF, 0xD8, 0xFF],                                 // JPEG
    &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A], // PNG
    b"GIF87a",
    b"GIF89a",
    b"RIFF", // WebP container
    b"BM",   // BMP
];

fn has_image_signature(data: &[u8]) -> bool {
    IMAGE_SIGNATURES.iter().any(|sig| data.starts_with(sig))
}

/// Returns the blob contents as base64 text
///
/// Blobs written in the browser environment already hold base64 text and are
/// returned verbatim. Blobs starting with a known image signature are raw
/// bytes and are encoded. Otherwise the blob is assumed to be base64 text
/// whenever it decodes as such: a raw blob that happens to be valid base64
/// ASCII cannot be told apart and is passed through.
pub fn as_base64_text(data: &[u8]) -> String {
    if has_image_signature(data) {
        return to_base64(data);
    }
    match std::str::from_utf8(data) {
        Ok(text) if !text.is_empty() && BASE64.decode(text.trim()).is_ok() => {
            text.trim().to_string()
        }
        _ => to_base64(data),
    }
}

/// Builds an inline data reference for base64 encoded image text
pub fn data_uri(media_type: &str, base64_text: &str) -> String {
    format!("data:{};base64,{}", media_type, base64_text)
}

/// Rewrites a device-local file location into a URL the webview can load
///
/// Absolute paths and `file://` URIs are mapped under the webview server's
/// file prefix. Anything else is returned unchanged.
pub fn convert_file_src(uri: &str, server_url: &str) -> String {
    let server = server_url.trim_end_matches('/');
    if let Some(path) = uri.strip_prefix(FILE_SCHEME) {
        format!("{}{}{}", server, FILE_SERVER_PREFIX, path)
    } else if uri.starts_with('/') {
        format!("{}{}{}", server, FILE_SERVER_PREFIX, uri)
    } else {
        uri.to_string()
    }
}

/// File extension for an image format reported by a capture device
///
/// `jpg` is normalized to `jpeg`. Anything that is not a plain alphanumeric
/// token yields `None`.
pub fn format_extension(format: &str) -> Option<String> {
    let ext = format.trim().trim_start_matches('.').to_ascii_lowercase();
    if ext.is_empty() || !ext.chars().all(|c| c.is_ascii_alphanumeric()) {
        return None;
    }
    Some(if ext == "jpg" { "jpeg".to_string() } else { ext })
}

/// Media type of the image stored under `storage_path`, taken from its
/// extension, or `fallback` when the name has none
pub fn media_type_for(storage_path: &str, fallback: &str) -> String {
    let name = storage_path.rsplit('/').next().unwrap_or(storage_path);
    match name.rsplit_once('.').and_then(|(_, ext)| format_extension(ext)) {
        Some(ext) if ext == "svg" => "image/svg+xml".to_string(),
        Some(ext) => format!("image/{}", ext),
        None => fallback.to_string(),
    }
}
