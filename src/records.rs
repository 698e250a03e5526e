//! Persistence for business and product records.
//!
//! [`RecordStore`] is the boundary the rest of the crate talks to. A record
//! is created in a single call from a [`NewBusiness`], which assigns:
//!
//! - a business id, sequential from 1
//! - one product id per product, sequential from 1 across the whole store
//! - the same UTC creation timestamp on the business and its products
//!
//! Products keep their submission order. There is no update or delete.
//!
//! [`JsonRecordStore`] keeps everything in one JSON document and replaces it
//! atomically (write to a sibling temp file, then rename), so a failed write
//! never leaves a business without its products or a truncated file.
//! [`MemoryRecordStore`] holds the same document in memory.

use crate::types::{Business, NewBusiness, Product};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RecordError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("business {0} not found")]
    NotFound(u64),
}

pub trait RecordStore: Send + Sync {
    /// Persist a business with all its products in one operation.
    fn create(&self, new: NewBusiness) -> Result<Business, RecordError>;

    fn get(&self, id: u64) -> Result<Business, RecordError>;

    /// All records in creation order.
    fn list(&self) -> Result<Vec<Business>, RecordError>;
}

/// The persisted document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
struct RecordsDocument {
    last_business_id: u64,
    last_product_id: u64,
    businesses: Vec<Business>,
}

impl RecordsDocument {
    fn insert(&mut self, new: NewBusiness, now: DateTime<Utc>) -> Business {
        self.last_business_id += 1;
        let business_id = self.last_business_id;

        let mut products = Vec::with_capacity(new.products.len());
        for p in new.products {
            self.last_product_id += 1;
            products.push(Product {
                id: self.last_product_id,
                business_id,
                name: p.name,
                price: p.price,
                description: p.description,
                image_path: p.image_path,
                created_at: now,
            });
        }

        let business = Business {
            id: business_id,
            name: new.name,
            tagline: new.tagline,
            email: new.email,
            phone: new.phone,
            address: new.address,
            facebook: new.facebook,
            instagram: new.instagram,
            twitter: new.twitter,
            logo_path: new.logo_path,
            theme: new.theme,
            created_at: now,
            products,
        };
        self.businesses.push(business.clone());
        business
    }

    fn get(&self, id: u64) -> Result<Business, RecordError> {
        self.businesses
            .iter()
            .find(|b| b.id == id)
            .cloned()
            .ok_or(RecordError::NotFound(id))
    }
}

// ============================================================================
// JSON file
// ============================================================================

pub struct JsonRecordStore {
    path: PathBuf,
    // Serializes read-modify-write cycles within this process.
    lock: Mutex<()>,
}

impl JsonRecordStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<RecordsDocument, RecordError> {
        if !self.path.exists() {
            return Ok(RecordsDocument::default());
        }
        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(RecordsDocument::default());
        }
        Ok(serde_json::from_str(&content)?)
    }

    fn save(&self, doc: &RecordsDocument) -> Result<(), RecordError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(doc)?;
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    fn guard(&self) -> std::sync::MutexGuard<'_, ()> {
        self.lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl RecordStore for JsonRecordStore {
    fn create(&self, new: NewBusiness) -> Result<Business, RecordError> {
        let _guard = self.guard();
        let mut doc = self.load()?;
        let business = doc.insert(new, Utc::now());
        self.save(&doc)?;
        Ok(business)
    }

    fn get(&self, id: u64) -> Result<Business, RecordError> {
        let _guard = self.guard();
        self.load()?.get(id)
    }

    fn list(&self) -> Result<Vec<Business>, RecordError> {
        let _guard = self.guard();
        Ok(self.load()?.businesses)
    }
}

// ============================================================================
// In memory
// ============================================================================

#[derive(Default)]
pub struct MemoryRecordStore {
    doc: Mutex<RecordsDocument>,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn doc(&self) -> std::sync::MutexGuard<'_, RecordsDocument> {
        self.doc.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl RecordStore for MemoryRecordStore {
    fn create(&self, new: NewBusiness) -> Result<Business, RecordError> {
        Ok(self.doc().insert(new, Utc::now()))
    }

    fn get(&self, id: u64) -> Result<Business, RecordError> {
        self.doc().get(id)
    }

    fn list(&self) -> Result<Vec<Business>, RecordError> {
        Ok(self.doc().businesses.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::NewProduct;
    use tempfile::TempDir;

    fn new_business(name: &str, products: &[&str]) -> NewBusiness {
        NewBusiness {
            name: name.to_string(),
            theme: "minimal".to_string(),
            products: products
                .iter()
                .map(|p| NewProduct {
                    name: p.to_string(),
                    price: 2.5,
                    ..NewProduct::default()
                })
                .collect(),
            ..NewBusiness::default()
        }
    }

    fn exercise(store: &dyn RecordStore) {
        let first = store.create(new_business("First", &["A", "B"])).unwrap();
        let second = store.create(new_business("Second", &["C"])).unwrap();

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
        assert_eq!(
            first.products.iter().map(|p| p.id).collect::<Vec<_>>(),
            vec![1, 2]
        );
        assert_eq!(second.products[0].id, 3);
        assert!(first.products.iter().all(|p| p.business_id == 1));
        assert!(first.products.iter().all(|p| p.created_at == first.created_at));

        let fetched = store.get(1).unwrap();
        assert_eq!(fetched, first);
        assert_eq!(
            fetched.products.iter().map(|p| p.name.as_str()).collect::<Vec<_>>(),
            vec!["A", "B"]
        );

        let all = store.list().unwrap();
        assert_eq!(all.iter().map(|b| b.id).collect::<Vec<_>>(), vec![1, 2]);

        assert!(matches!(store.get(99), Err(RecordError::NotFound(99))));
    }

    #[test]
    fn memory_store_contract() {
        exercise(&MemoryRecordStore::new());
    }

    #[test]
    fn json_store_contract() {
        let tmp = TempDir::new().unwrap();
        exercise(&JsonRecordStore::new(tmp.path().join("data/records.json")));
    }

    #[test]
    fn json_store_survives_reopen() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("records.json");
        JsonRecordStore::new(&path)
            .create(new_business("Shop", &["Mug"]))
            .unwrap();

        let reopened = JsonRecordStore::new(&path);
        let b = reopened.create(new_business("Other", &["Cup"])).unwrap();
        assert_eq!(b.id, 2);
        assert_eq!(b.products[0].id, 2);
        assert_eq!(reopened.get(1).unwrap().name, "Shop");
        assert!(!tmp.path().join("records.json.tmp").exists());
    }

    #[test]
    fn json_store_empty_file_is_empty_store() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("records.json");
        fs::write(&path, "").unwrap();
        assert!(JsonRecordStore::new(&path).list().unwrap().is_empty());
    }

    #[test]
    fn json_store_corrupt_file_is_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("records.json");
        fs::write(&path, "{not json").unwrap();
        let store = JsonRecordStore::new(&path);
        assert!(matches!(store.list(), Err(RecordError::Json(_))));
        assert!(store.create(new_business("A", &["B"])).is_err());
        assert_eq!(fs::read_to_string(&path).unwrap(), "{not json");
    }
}
