//! Image processing backend trait and shared types.
//!
//! The [`ImageBackend`] trait defines the two operations the asset processor
//! needs: identify and downscale. Both work on in-memory bytes so uploads can
//! live in any [`Storage`](crate::storage::Storage).
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend): pure Rust, built on
//! the `image` crate.

use super::params::ResizeParams;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Processing failed: {0}")]
    ProcessingFailed(String),
}

/// Result of an identify operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

/// A re-encoded image and its final dimensions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Downscaled {
    pub bytes: Vec<u8>,
    pub dimensions: Dimensions,
}

/// Trait for image processing backends.
pub trait ImageBackend: Send + Sync {
    /// Get image dimensions.
    fn identify(&self, bytes: &[u8]) -> Result<Dimensions, BackendError>;

    /// Decode, shrink to fit `params.bounds` (never enlarge), and re-encode
    /// in `params.kind` at `params.quality`.
    fn downscale(&self, bytes: &[u8], params: &ResizeParams) -> Result<Downscaled, BackendError>;
}
