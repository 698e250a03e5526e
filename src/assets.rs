//! Upload storage and normalization for logos and product photos.
//!
//! [`AssetProcessor::store_image`] is the single entry point. For each
//! upload it:
//!
//! 1. Checks the extension against [`ImageKind::EXTENSIONS`]. Anything else
//!    is dropped without a write: [`AssetOutcome::Skipped`].
//! 2. Writes the raw bytes to the upload storage under
//!    `<slug>_<category>_<filename>` (see [`upload_filename`]).
//! 3. Downscales in place to the role's bound and re-encodes at the
//!    configured quality.
//!
//! A failed resize is not an error. The raw upload stays in storage and the
//! key is still returned, as [`AssetOutcome::StoredUnresized`]. Only storage
//! failures propagate.
//!
//! ## Roles
//!
//! | Role | Category tag | Default bound |
//! |---|---|---|
//! | Logo | `logo` | 400×300 |
//! | Product *i* | `product_<i>` | 600×400 |

use crate::config::ImagesConfig;
use crate::imaging::{Bounds, ImageBackend, ImageKind, Quality, ResizeParams};
use crate::slug::upload_filename;
use crate::storage::{Storage, StorageError};
use std::fmt;
use tracing::{debug, warn};

/// An uploaded file as received from the form layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Upload {
    pub filename: String,
    pub bytes: Vec<u8>,
}

impl Upload {
    pub fn new(filename: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            filename: filename.into(),
            bytes: bytes.into(),
        }
    }
}

/// What an upload is for. Determines the category tag and size bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetRole {
    Logo,
    /// Product photo, indexed by the row's position in the submitted form.
    Product(usize),
}

impl AssetRole {
    pub fn category(self) -> String {
        match self {
            AssetRole::Logo => "logo".to_string(),
            AssetRole::Product(index) => format!("product_{index}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The file field was present but carried no filename.
    NoFile,
    UnsupportedExtension(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::NoFile => write!(f, "no file selected"),
            SkipReason::UnsupportedExtension(name) => {
                write!(f, "unsupported file type: {name}")
            }
        }
    }
}

/// Result of storing one upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetOutcome {
    Stored { key: String },
    /// Stored as uploaded; the resize step failed with `reason`.
    StoredUnresized { key: String, reason: String },
    Skipped(SkipReason),
}

impl AssetOutcome {
    /// Storage key to record, if anything was stored.
    pub fn key(&self) -> Option<&str> {
        match self {
            AssetOutcome::Stored { key } | AssetOutcome::StoredUnresized { key, .. } => {
                Some(key.as_str())
            }
            AssetOutcome::Skipped(_) => None,
        }
    }

    pub fn into_key(self) -> Option<String> {
        match self {
            AssetOutcome::Stored { key } | AssetOutcome::StoredUnresized { key, .. } => Some(key),
            AssetOutcome::Skipped(_) => None,
        }
    }
}

/// Size bounds and encode quality for stored images.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AssetLimits {
    pub logo_max: Bounds,
    pub product_max: Bounds,
    pub quality: Quality,
}

impl AssetLimits {
    pub fn from_config(images: &ImagesConfig) -> Self {
        Self {
            logo_max: images.logo_max,
            product_max: images.product_max,
            quality: Quality::new(images.quality),
        }
    }

    pub fn bounds_for(&self, role: AssetRole) -> Bounds {
        match role {
            AssetRole::Logo => self.logo_max,
            AssetRole::Product(_) => self.product_max,
        }
    }
}

impl Default for AssetLimits {
    fn default() -> Self {
        Self::from_config(&ImagesConfig::default())
    }
}

pub struct AssetProcessor<'a> {
    storage: &'a dyn Storage,
    backend: &'a dyn ImageBackend,
    limits: AssetLimits,
}

impl<'a> AssetProcessor<'a> {
    pub fn new(storage: &'a dyn Storage, backend: &'a dyn ImageBackend, limits: AssetLimits) -> Self {
        Self {
            storage,
            backend,
            limits,
        }
    }

    /// Validate, store and normalize one upload for the business `slug`.
    pub fn store_image(
        &self,
        upload: &Upload,
        role: AssetRole,
        slug: &str,
    ) -> Result<AssetOutcome, StorageError> {
        if upload.filename.trim().is_empty() {
            return Ok(AssetOutcome::Skipped(SkipReason::NoFile));
        }
        let Some(kind) = ImageKind::from_filename(&upload.filename) else {
            debug!(filename = %upload.filename, "dropping upload with unsupported extension");
            return Ok(AssetOutcome::Skipped(SkipReason::UnsupportedExtension(
                upload.filename.clone(),
            )));
        };

        let key = upload_filename(slug, &role.category(), &upload.filename);
        self.storage.write(&key, &upload.bytes)?;

        let params = ResizeParams {
            bounds: self.limits.bounds_for(role),
            kind,
            quality: self.limits.quality,
        };
        match self.backend.downscale(&upload.bytes, &params) {
            Ok(resized) => {
                self.storage.write(&key, &resized.bytes)?;
                debug!(
                    key = %key,
                    width = resized.dimensions.width,
                    height = resized.dimensions.height,
                    "stored image"
                );
                Ok(AssetOutcome::Stored { key })
            }
            Err(e) => {
                warn!(key = %key, error = %e, "error resizing image; keeping original");
                Ok(AssetOutcome::StoredUnresized {
                    key,
                    reason: e.to_string(),
                })
            }
        }
    }
}
