//! Parameter types for image operations.
//!
//! These structs describe *what* to do, not *how* to do it. They sit between
//! the asset processor (which decides the bound for a role) and the
//! [`backend`](super::backend) (which does the pixel work), so tests can swap
//! in a mock backend without touching asset logic.
//!
//! ## Types
//!
//! - [`Quality`]: Lossy encoding quality (1–100, default 85). Clamped on construction.
//! - [`Bounds`]: Maximum width and height an image may occupy after processing.
//! - [`ImageKind`]: The accepted upload formats, keyed by file extension.
//! - [`ResizeParams`]: Full specification for a downscale: bound, format, quality.

use serde::{Deserialize, Serialize};

/// Quality setting for lossy image encoding (1-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality(pub u32);

impl Quality {
    pub fn new(value: u32) -> Self {
        Self(value.clamp(1, 100))
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(85)
    }
}

/// Maximum dimensions, as `[width, height]` in config files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "[u32; 2]", into = "[u32; 2]")]
pub struct Bounds {
    pub width: u32,
    pub height: u32,
}

impl Bounds {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl From<[u32; 2]> for Bounds {
    fn from([width, height]: [u32; 2]) -> Self {
        Self { width, height }
    }
}

impl From<Bounds> for [u32; 2] {
    fn from(b: Bounds) -> Self {
        [b.width, b.height]
    }
}

/// Upload formats the asset processor accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    Png,
    Jpeg,
    Gif,
    WebP,
}

impl ImageKind {
    /// Every accepted extension, lowercase.
    pub const EXTENSIONS: &'static [&'static str] = &["png", "jpg", "jpeg", "gif", "webp"];

    /// Match an extension case-insensitively.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "png" => Some(Self::Png),
            "jpg" | "jpeg" => Some(Self::Jpeg),
            "gif" => Some(Self::Gif),
            "webp" => Some(Self::WebP),
            _ => None,
        }
    }

    /// Extract and match the extension of a filename (`"a.b.JPG"` → Jpeg).
    pub fn from_filename(name: &str) -> Option<Self> {
        let (_, ext) = name.rsplit_once('.')?;
        Self::from_extension(ext)
    }
}

/// Parameters for an in-place downscale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResizeParams {
    pub bounds: Bounds,
    pub kind: ImageKind,
    pub quality: Quality,
}
