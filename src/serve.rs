//! Path-scoped reads from a generated site.
//!
//! [`serve`] resolves `<slug>/<relative path>` in the sites storage. The
//! request path is normalized here, before any lookup:
//!
//! - empty paths and paths ending in `/` mean `index.html` in that directory
//! - `.` and empty segments are dropped, `\` counts as a separator
//! - any `..` segment, drive prefix (`:`) or NUL is rejected as
//!   [`ServeError::InvalidPath`]
//!
//! The slug itself must already be a valid slug. Anything else is treated
//! as an invalid path rather than a lookup.

use crate::slug::is_valid_slug;
use crate::storage::{Storage, StorageError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ServeError {
    #[error("invalid path: {0:?}")]
    InvalidPath(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServedFile {
    /// Normalized path relative to the site root.
    pub path: String,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

const INDEX: &str = "index.html";

/// Normalize a request path relative to a site root.
pub fn normalize_request_path(relative: &str) -> Result<String, ServeError> {
    let unified = relative.replace('\\', "/");
    let mut segments = Vec::new();
    for segment in unified.split('/') {
        match segment {
            "" | "." => continue,
            ".." => return Err(ServeError::InvalidPath(relative.to_string())),
            s if s.contains(':') || s.contains('\0') => {
                return Err(ServeError::InvalidPath(relative.to_string()));
            }
            s => segments.push(s),
        }
    }
    if segments.is_empty() || unified.ends_with('/') {
        segments.push(INDEX);
    }
    Ok(segments.join("/"))
}

/// Content type by file extension.
pub fn content_type(path: &str) -> &'static str {
    let ext = path
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "html" | "htm" => "text/html; charset=utf-8",
        "css" => "text/css; charset=utf-8",
        "js" => "text/javascript; charset=utf-8",
        "json" => "application/json",
        "txt" => "text/plain; charset=utf-8",
        "svg" => "image/svg+xml",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "ico" => "image/x-icon",
        "zip" => "application/zip",
        _ => "application/octet-stream",
    }
}

/// Whether a generated site exists for `slug`.
pub fn site_exists(sites: &dyn Storage, slug: &str) -> bool {
    is_valid_slug(slug) && sites.exists(&format!("{slug}/{INDEX}"))
}

/// Read one file of a generated site.
pub fn serve(sites: &dyn Storage, slug: &str, relative: &str) -> Result<ServedFile, ServeError> {
    if !is_valid_slug(slug) {
        return Err(ServeError::InvalidPath(slug.to_string()));
    }
    let path = normalize_request_path(relative)?;
    let key = format!("{slug}/{path}");
    if !sites.exists(&key) {
        return Err(ServeError::NotFound(key));
    }
    let bytes = sites.read(&key)?;
    Ok(ServedFile {
        content_type: content_type(&path),
        path,
        bytes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    fn sites() -> MemoryStorage {
        let s = MemoryStorage::new();
        s.write("shop/index.html", b"<h1>home</h1>").unwrap();
        s.write("shop/assets/style.css", b"body{}").unwrap();
        s.write("shop/images/logo.PNG", b"png").unwrap();
        s.write("secret.txt", b"nope").unwrap();
        s
    }

    #[test]
    fn normalize_defaults_to_index() {
        assert_eq!(normalize_request_path("").unwrap(), "index.html");
        assert_eq!(normalize_request_path("/").unwrap(), "index.html");
        assert_eq!(normalize_request_path("./").unwrap(), "index.html");
        assert_eq!(normalize_request_path("assets/").unwrap(), "assets/index.html");
    }

    #[test]
    fn normalize_collapses_segments() {
        assert_eq!(
            normalize_request_path("assets//./style.css").unwrap(),
            "assets/style.css"
        );
        assert_eq!(
            normalize_request_path("assets\\style.css").unwrap(),
            "assets/style.css"
        );
    }

    #[test]
    fn normalize_rejects_traversal() {
        for bad in ["..", "../secret.txt", "assets/../../x", "..\\x", "c:/x", "a\0b"] {
            assert!(
                matches!(normalize_request_path(bad), Err(ServeError::InvalidPath(_))),
                "{bad:?}"
            );
        }
    }

    #[test]
    fn serves_index_by_default() {
        let f = serve(&sites(), "shop", "").unwrap();
        assert_eq!(f.path, "index.html");
        assert_eq!(f.content_type, "text/html; charset=utf-8");
        assert_eq!(f.bytes, b"<h1>home</h1>");
    }

    #[test]
    fn serves_nested_file_with_type() {
        let f = serve(&sites(), "shop", "assets/style.css").unwrap();
        assert_eq!(f.content_type, "text/css; charset=utf-8");
        let logo = serve(&sites(), "shop", "images/logo.PNG").unwrap();
        assert_eq!(logo.content_type, "image/png");
    }

    #[test]
    fn traversal_never_escapes_site() {
        let err = serve(&sites(), "shop", "../secret.txt").unwrap_err();
        assert!(matches!(err, ServeError::InvalidPath(_)));
        let err = serve(&sites(), "..", "secret.txt").unwrap_err();
        assert!(matches!(err, ServeError::InvalidPath(_)));
    }

    #[test]
    fn missing_file_and_site_not_found() {
        assert!(matches!(
            serve(&sites(), "shop", "nope.html"),
            Err(ServeError::NotFound(_))
        ));
        assert!(matches!(
            serve(&sites(), "other", ""),
            Err(ServeError::NotFound(_))
        ));
    }

    #[test]
    fn site_exists_checks_index() {
        let s = sites();
        assert!(site_exists(&s, "shop"));
        assert!(!site_exists(&s, "other"));
        assert!(!site_exists(&s, "../shop"));
    }

    #[test]
    fn unknown_extension_is_octet_stream() {
        assert_eq!(content_type("file.bin"), "application/octet-stream");
        assert_eq!(content_type("README"), "application/octet-stream");
        assert_eq!(content_type("page.HTML"), "text/html; charset=utf-8");
    }
}
