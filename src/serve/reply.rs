//! Responses produced by the request handler.
//!
//! Kept independent of `tiny_http` so routing and rendering can be tested
//! without a listener.

use std::{
    fs::File,
    io,
    path::Path,
};

pub const HTML: &str = "text/html; charset=utf-8";
pub const TEXT: &str = "text/plain; charset=utf-8";

#[derive(Debug)]
pub enum Body {
    Bytes(Vec<u8>),
    /// An open static asset, streamed to the client and closed on drop.
    File(File),
}

#[derive(Debug)]
pub struct Reply {
    pub status: u16,
    pub content_type: &'static str,
    pub location: Option<&'static str>,
    pub body: Body,
}

impl Reply {
    pub const fn html(status: u16, bytes: Vec<u8>) -> Self {
        Self {
            status,
            content_type: HTML,
            location: None,
            body: Body::Bytes(bytes),
        }
    }

    pub fn text(status: u16, message: String) -> Self {
        Self {
            status,
            content_type: TEXT,
            location: None,
            body: Body::Bytes(message.into_bytes()),
        }
    }

    pub fn redirect(location: &'static str) -> Self {
        Self {
            status: 302,
            content_type: TEXT,
            location: Some(location),
            body: Body::Bytes(Vec::new()),
        }
    }

    /// Open a static asset. Directories and missing files are `NotFound`.
    pub fn file(path: &Path) -> io::Result<Self> {
        let file = File::open(path)?;
        if !file.metadata()?.is_file() {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("`{}` is not a file", path.display()),
            ));
        }
        Ok(Self {
            status: 200,
            content_type: guess_content_type(path),
            location: None,
            body: Body::File(file),
        })
    }

    /// Drain the body into memory.
    #[cfg(test)]
    pub fn into_bytes(self) -> io::Result<Vec<u8>> {
        match self.body {
            Body::Bytes(bytes) => Ok(bytes),
            Body::File(mut file) => {
                use std::io::Read;
                let mut bytes = Vec::new();
                file.read_to_end(&mut bytes)?;
                Ok(bytes)
            }
        }
    }
}

// ============================================================================
// Content Type Detection
// ============================================================================

/// Guess MIME content type from file extension.
///
/// Returns `application/octet-stream` for unknown extensions.
pub fn guess_content_type(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    match ext.as_deref() {
        // Web content
        Some("html" | "htm") => HTML,
        Some("css") => "text/css; charset=utf-8",
        Some("js" | "mjs") => "application/javascript; charset=utf-8",
        Some("json") => "application/json; charset=utf-8",
        Some("xml") => "application/xml; charset=utf-8",

        // Images
        Some("svg") => "image/svg+xml",
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("avif") => "image/avif",
        Some("ico") => "image/x-icon",

        // Fonts
        Some("woff") => "font/woff",
        Some("woff2") => "font/woff2",
        Some("ttf") => "font/ttf",
        Some("otf") => "font/otf",

        // Documents
        Some("pdf") => "application/pdf",
        Some("txt") => TEXT,
        Some("md") => "text/markdown; charset=utf-8",

        _ => "application/octet-stream",
    }
}
