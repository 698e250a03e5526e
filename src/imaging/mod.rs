//! Image processing in pure Rust.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Identify** | `image::ImageReader::into_dimensions` |
//! | **Downscale** | [`fit_within`] + Lanczos3 `resize_exact` |
//! | **Re-encode** | JPEG at fixed quality, PNG best compression, GIF, lossless WebP |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for dimension math (unit testable)
//! - **Parameters**: Data structures describing image operations
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]

pub mod backend;
mod calculations;
mod params;
pub mod rust_backend;

pub use backend::{BackendError, Dimensions, Downscaled, ImageBackend};
pub use calculations::fit_within;
pub use params::{Bounds, ImageKind, Quality, ResizeParams};
pub use rust_backend::RustBackend;
