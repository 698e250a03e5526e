//! Site records: the structured input to generation.
//!
//! A [`Business`] owns its [`Product`]s in submission order. Records are
//! created once from a [`NewBusiness`] by a
//! [`RecordStore`](crate::records::RecordStore), which assigns ids and
//! timestamps; there is no edit path.
//!
//! Asset references (`logo_path`, `image_path`) are keys into the upload
//! [`Storage`](crate::storage::Storage), not filesystem paths.

use crate::slug::slugify;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Theme used when a submission leaves the selector blank.
pub const DEFAULT_THEME: &str = "minimal";

fn default_theme() -> String {
    DEFAULT_THEME.to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Business {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub tagline: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub facebook: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instagram: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub twitter: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo_path: Option<String>,
    #[serde(default = "default_theme")]
    pub theme: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub products: Vec<Product>,
}

impl Business {
    /// Site directory name for this business.
    pub fn slug(&self) -> String {
        slugify(&self.name)
    }

    /// Social links that are present, as `(label, url)` pairs.
    pub fn social_links(&self) -> Vec<(&'static str, &str)> {
        [
            ("Facebook", self.facebook.as_deref()),
            ("Instagram", self.instagram.as_deref()),
            ("Twitter", self.twitter.as_deref()),
        ]
        .into_iter()
        .filter_map(|(label, url)| url.map(|u| (label, u)))
        .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: u64,
    pub business_id: u64,
    pub name: String,
    pub price: f64,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_path: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Product {
    /// Price formatted with two decimals (`3.5` → `"3.50"`).
    pub fn display_price(&self) -> String {
        format!("{:.2}", self.price)
    }
}

/// A validated business awaiting persistence.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NewBusiness {
    pub name: String,
    pub tagline: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub facebook: Option<String>,
    pub instagram: Option<String>,
    pub twitter: Option<String>,
    pub logo_path: Option<String>,
    pub theme: String,
    pub products: Vec<NewProduct>,
}

impl NewBusiness {
    pub fn slug(&self) -> String {
        slugify(&self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct NewProduct {
    pub name: String,
    pub price: f64,
    pub description: String,
    pub image_path: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::sample_business;

    #[test]
    fn business_slug_uses_sanitizer() {
        let b = sample_business("Joe's Café!", &["Coffee"]);
        assert_eq!(b.slug(), "joe_s_caf__");
    }

    #[test]
    fn social_links_skip_absent() {
        let mut b = sample_business("Shop", &["Mug"]);
        b.facebook = Some("https://facebook.com/shop".into());
        b.twitter = Some("https://twitter.com/shop".into());
        assert_eq!(
            b.social_links(),
            vec![
                ("Facebook", "https://facebook.com/shop"),
                ("Twitter", "https://twitter.com/shop")
            ]
        );
    }

    #[test]
    fn display_price_two_decimals() {
        let b = sample_business("Shop", &["Mug"]);
        let mut p = b.products[0].clone();
        p.price = 3.5;
        assert_eq!(p.display_price(), "3.50");
        p.price = 0.0;
        assert_eq!(p.display_price(), "0.00");
    }

    #[test]
    fn business_json_defaults_theme() {
        let json = r#"{"id":1,"name":"A","created_at":"2024-01-01T00:00:00Z"}"#;
        let b: Business = serde_json::from_str(json).unwrap();
        assert_eq!(b.theme, "minimal");
        assert!(b.products.is_empty());
        assert!(b.logo_path.is_none());
    }
}
