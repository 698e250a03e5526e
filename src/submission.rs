//! Form boundary: raw field values and uploads in, a validated record out.
//!
//! The web handler and the `create` command both fill a [`SubmissionForm`]
//! with plain strings and [`Upload`]s. Product fields arrive as parallel
//! lists, one entry per form row, exactly as a multi-row HTML form posts
//! them. [`SubmissionForm::validate`] then:
//!
//! - trims the business name and rejects an empty one
//! - drops product rows whose name is blank, keeping the form index of the
//!   rest (the index names the stored upload: `product_<i>`)
//! - rejects a submission with no named product
//! - parses prices leniently: missing, unparsable, negative or non-finite
//!   input becomes `0.0`
//! - turns blank social links into `None` and a blank theme into
//!   [`DEFAULT_THEME`]
//!
//! Validation runs before anything is written, so a rejected submission
//! leaves no uploads or records behind.

use crate::assets::Upload;
use crate::types::{DEFAULT_THEME, NewBusiness, NewProduct};
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Business name is required!")]
    MissingName,
    #[error("At least one product is required!")]
    NoProducts,
}

/// Raw submission, one field per form input.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubmissionForm {
    pub business_name: String,
    pub tagline: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub facebook: String,
    pub instagram: String,
    pub twitter: String,
    pub theme: String,
    pub logo: Option<Upload>,
    pub product_names: Vec<String>,
    pub product_prices: Vec<String>,
    pub product_descriptions: Vec<String>,
    pub product_images: Vec<Option<Upload>>,
}

/// A product row that survived validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductRow {
    /// Position of the row in the submitted form.
    pub form_index: usize,
    pub product: NewProduct,
    pub image: Option<Upload>,
}

/// A submission ready for asset storage and persistence.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidSubmission {
    /// Business fields; asset paths are still unset.
    pub business: NewBusiness,
    pub logo: Option<Upload>,
    pub products: Vec<ProductRow>,
}

impl ValidSubmission {
    pub fn slug(&self) -> String {
        self.business.slug()
    }
}

/// Parse a form price. Anything that is not a finite, non-negative number
/// becomes `0.0`.
pub fn parse_price(raw: &str) -> f64 {
    match raw.trim().parse::<f64>() {
        Ok(p) if p.is_finite() && p >= 0.0 => p,
        _ => 0.0,
    }
}

fn optional(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

impl SubmissionForm {
    pub fn validate(self) -> Result<ValidSubmission, ValidationError> {
        let name = self.business_name.trim().to_string();
        if name.is_empty() {
            return Err(ValidationError::MissingName);
        }
        if !self.product_names.iter().any(|n| !n.trim().is_empty()) {
            return Err(ValidationError::NoProducts);
        }

        let mut images = self.product_images.into_iter();
        let mut products = Vec::new();
        for (form_index, raw_name) in self.product_names.iter().enumerate() {
            let image = images.next().flatten();
            if raw_name.trim().is_empty() {
                continue;
            }
            let price = self
                .product_prices
                .get(form_index)
                .map(|p| parse_price(p))
                .unwrap_or(0.0);
            let description = self
                .product_descriptions
                .get(form_index)
                .cloned()
                .unwrap_or_default();
            products.push(ProductRow {
                form_index,
                product: NewProduct {
                    name: raw_name.trim().to_string(),
                    price,
                    description,
                    image_path: None,
                },
                image: image.filter(|u| !u.filename.is_empty()),
            });
        }

        let theme = optional(&self.theme).unwrap_or_else(|| DEFAULT_THEME.to_string());
        Ok(ValidSubmission {
            business: NewBusiness {
                name,
                tagline: self.tagline.trim().to_string(),
                email: self.email.trim().to_string(),
                phone: self.phone.trim().to_string(),
                address: self.address.trim().to_string(),
                facebook: optional(&self.facebook),
                instagram: optional(&self.instagram),
                twitter: optional(&self.twitter),
                logo_path: None,
                theme,
                products: Vec::new(),
            },
            logo: self.logo.filter(|u| !u.filename.is_empty()),
            products,
        })
    }
}

// ============================================================================
// Submission files (CLI)
// ============================================================================

/// A submission described in TOML, with images given as local file paths.
///
/// ```toml
/// business_name = "Joe's Café!"
/// tagline = "Coffee, done right"
/// theme = "minimal"
/// logo = "photos/logo.png"
///
/// [[products]]
/// name = "Coffee"
/// price = "3.5"
/// image = "photos/coffee.jpg"
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SubmissionFile {
    pub business_name: String,
    pub tagline: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub facebook: String,
    pub instagram: String,
    pub twitter: String,
    pub theme: String,
    pub logo: Option<String>,
    pub products: Vec<SubmissionFileProduct>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SubmissionFileProduct {
    pub name: String,
    /// Kept as text so it goes through the same lenient parsing as the form.
    pub price: toml::Value,
    pub description: String,
    pub image: Option<String>,
}

#[derive(Error, Debug)]
pub enum SubmissionFileError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

fn read_upload(base: &Path, relative: &str) -> Result<Upload, SubmissionFileError> {
    let path = base.join(relative);
    let bytes = std::fs::read(&path).map_err(|source| SubmissionFileError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let filename = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    Ok(Upload { filename, bytes })
}

fn price_text(value: &toml::Value) -> String {
    match value {
        toml::Value::String(s) => s.clone(),
        toml::Value::Integer(i) => i.to_string(),
        toml::Value::Float(f) => f.to_string(),
        _ => String::new(),
    }
}

impl Default for SubmissionFileProduct {
    fn default() -> Self {
        Self {
            name: String::new(),
            price: toml::Value::String(String::new()),
            description: String::new(),
            image: None,
        }
    }
}

impl SubmissionFile {
    pub fn parse(content: &str) -> Result<Self, SubmissionFileError> {
        Ok(toml::from_str(content)?)
    }

    /// Load a submission file; image paths resolve against its directory.
    pub fn load(path: &Path) -> Result<SubmissionForm, SubmissionFileError> {
        let content = std::fs::read_to_string(path).map_err(|source| SubmissionFileError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let base = path.parent().unwrap_or(Path::new("."));
        Self::parse(&content)?.into_form(base)
    }

    /// Convert into a form, reading image files relative to `base`.
    pub fn into_form(self, base: &Path) -> Result<SubmissionForm, SubmissionFileError> {
        let logo = self.logo.as_deref().map(|p| read_upload(base, p)).transpose()?;
        let mut form = SubmissionForm {
            business_name: self.business_name,
            tagline: self.tagline,
            email: self.email,
            phone: self.phone,
            address: self.address,
            facebook: self.facebook,
            instagram: self.instagram,
            twitter: self.twitter,
            theme: self.theme,
            logo,
            ..SubmissionForm::default()
        };
        for product in self.products {
            let image = product
                .image
                .as_deref()
                .map(|p| read_upload(base, p))
                .transpose()?;
            form.product_prices.push(price_text(&product.price));
            form.product_names.push(product.name);
            form.product_descriptions.push(product.description);
            form.product_images.push(image);
        }
        Ok(form)
    }
}
