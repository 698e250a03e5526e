//! ZIP packaging of a generated site.
//!
//! Every file under `<slug>/` becomes one deflated entry named by its path
//! relative to the site root (`index.html`, `assets/style.css`,
//! `images/logo.jpg`). Entries are added in sorted key order with the zip
//! default timestamp, so packaging the same site twice yields the same bytes.

use crate::serve::site_exists;
use crate::storage::{Storage, StorageError};
use std::io::{Cursor, Write};
use thiserror::Error;
use tracing::debug;
use zip::{CompressionMethod, ZipWriter, write::FileOptions};

#[derive(Error, Debug)]
pub enum PackageError {
    #[error("site not found: {0}")]
    SiteNotFound(String),
    #[error("zip error: {0}")]
    Zip(#[from] zip::result::ZipError),
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Archive {
    /// Download filename: `<slug>_microsite.zip`.
    pub filename: String,
    pub bytes: Vec<u8>,
    pub entries: usize,
}

pub fn archive_filename(slug: &str) -> String {
    format!("{slug}_microsite.zip")
}

/// Bundle the site for `slug` into an in-memory archive.
pub fn package(sites: &dyn Storage, slug: &str) -> Result<Archive, PackageError> {
    if !site_exists(sites, slug) {
        return Err(PackageError::SiteNotFound(slug.to_string()));
    }
    let prefix = format!("{slug}/");
    let keys = sites.list(slug)?;

    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = FileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .unix_permissions(0o644);
    let mut entries = 0;
    for key in &keys {
        let Some(name) = key.strip_prefix(&prefix) else {
            continue;
        };
        zip.start_file(name, options)?;
        zip.write_all(&sites.read(key)?)?;
        entries += 1;
    }
    let bytes = zip.finish()?.into_inner();
    debug!(slug, entries, bytes = bytes.len(), "packaged site");

    Ok(Archive {
        filename: archive_filename(slug),
        bytes,
        entries,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{FsStorage, MemoryStorage};
    use std::collections::BTreeMap;
    use std::io::Read;
    use tempfile::TempDir;
    use zip::ZipArchive;

    fn unpack(bytes: &[u8]) -> BTreeMap<String, Vec<u8>> {
        let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut out = BTreeMap::new();
        for i in 0..archive.len() {
            let mut file = archive.by_index(i).unwrap();
            let mut content = Vec::new();
            file.read_to_end(&mut content).unwrap();
            out.insert(file.name().to_string(), content);
        }
        out
    }

    fn populate(storage: &dyn Storage) {
        storage.write("shop/index.html", b"<h1>Shop</h1>").unwrap();
        storage.write("shop/products.html", b"<p>Mug</p>").unwrap();
        storage.write("shop/assets/style.css", b"body{}").unwrap();
        storage.write("shop/images/logo.jpg", &[0xFF, 0xD8, 0xFF]).unwrap();
        storage.write("shopping/index.html", b"other site").unwrap();
    }

    #[test]
    fn entries_are_relative_to_site_root() {
        let sites = MemoryStorage::new();
        populate(&sites);
        let archive = package(&sites, "shop").unwrap();
        assert_eq!(archive.filename, "shop_microsite.zip");
        assert_eq!(archive.entries, 4);

        let files = unpack(&archive.bytes);
        assert_eq!(
            files.keys().map(String::as_str).collect::<Vec<_>>(),
            vec!["assets/style.css", "images/logo.jpg", "index.html", "products.html"]
        );
        assert_eq!(files["images/logo.jpg"], vec![0xFF, 0xD8, 0xFF]);
    }

    #[test]
    fn round_trip_matches_directory() {
        let tmp = TempDir::new().unwrap();
        let sites = FsStorage::new(tmp.path());
        populate(&sites);

        let files = unpack(&package(&sites, "shop").unwrap().bytes);
        let source: BTreeMap<String, Vec<u8>> = sites
            .list("shop")
            .unwrap()
            .into_iter()
            .map(|k| {
                let bytes = std::fs::read(tmp.path().join(&k)).unwrap();
                (k.trim_start_matches("shop/").to_string(), bytes)
            })
            .collect();
        assert_eq!(files, source);
    }

    #[test]
    fn packaging_is_deterministic() {
        let sites = MemoryStorage::new();
        populate(&sites);
        assert_eq!(
            package(&sites, "shop").unwrap().bytes,
            package(&sites, "shop").unwrap().bytes
        );
    }

    #[test]
    fn missing_site_is_not_found() {
        let sites = MemoryStorage::new();
        populate(&sites);
        assert!(matches!(
            package(&sites, "nobody"),
            Err(PackageError::SiteNotFound(_))
        ));
        assert!(matches!(
            package(&sites, "../shop"),
            Err(PackageError::SiteNotFound(_))
        ));
    }
}
