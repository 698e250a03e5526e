//! Shared test utilities.
//!
//! Record builders and synthetic images, so tests never depend on fixture
//! files.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let business = sample_business("Joe's Café!", &["Coffee", "Tea"]);
//! assert_eq!(business.slug(), "joe_s_caf__");
//!
//! let photo = jpeg_bytes(1200, 800);
//! ```

use crate::types::{Business, Product};
use chrono::{DateTime, TimeZone, Utc};
use image::{ImageEncoder, Rgb, RgbImage};

// =========================================================================
// Records
// =========================================================================

/// Fixed timestamp for deterministic records.
pub fn fixed_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
}

/// A business with id 1 and the named products priced 1.00, 2.00, ...
pub fn sample_business(name: &str, products: &[&str]) -> Business {
    Business {
        id: 1,
        name: name.to_string(),
        tagline: "Fresh every day".to_string(),
        email: "hello@example.com".to_string(),
        phone: "555-0100".to_string(),
        address: "1 Main St".to_string(),
        facebook: None,
        instagram: None,
        twitter: None,
        logo_path: None,
        theme: "minimal".to_string(),
        created_at: fixed_time(),
        products: products
            .iter()
            .enumerate()
            .map(|(i, product)| Product {
                id: i as u64 + 1,
                business_id: 1,
                name: product.to_string(),
                price: (i + 1) as f64,
                description: String::new(),
                image_path: None,
                created_at: fixed_time(),
            })
            .collect(),
    }
}

// =========================================================================
// Synthetic images
// =========================================================================

fn gradient(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8])
    })
}

/// An encoded JPEG of the given size.
pub fn jpeg_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = gradient(width, height);
    let mut out = Vec::new();
    image::codecs::jpeg::JpegEncoder::new_with_quality(&mut out, 90)
        .write_image(img.as_raw(), width, height, image::ExtendedColorType::Rgb8)
        .unwrap();
    out
}

/// An encoded PNG of the given size.
pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = gradient(width, height);
    let mut out = Vec::new();
    image::codecs::png::PngEncoder::new(&mut out)
        .write_image(img.as_raw(), width, height, image::ExtendedColorType::Rgb8)
        .unwrap();
    out
}

/// Decoded dimensions of encoded image bytes.
pub fn decoded_size(bytes: &[u8]) -> (u32, u32) {
    let img = image::load_from_memory(bytes).unwrap();
    (img.width(), img.height())
}
