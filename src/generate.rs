//! Microsite generation.
//!
//! Turns one [`Business`] record into a themed static site under
//! `<slug>/` in the sites [`Storage`]. Generation is two-phase:
//!
//! 1. **Check.** Resolve the theme and verify the bundle provides all four
//!    artifacts. A missing artifact fails the call with
//!    [`GenerateError::MissingArtifacts`] before anything is written.
//! 2. **Write.** Copy images from the upload storage, then render and write
//!    the pages and stylesheet.
//!
//! ## Output Structure
//!
//! ```text
//! <slug>/
//! ├── index.html
//! ├── products.html
//! ├── about.html
//! ├── assets/
//! │   └── style.css
//! └── images/
//!     ├── logo.<ext>            # extension lower-cased
//!     ├── product_0.<ext>       # by position in the product list,
//!     └── product_2.<ext>       # extension kept as stored
//! ```
//!
//! A referenced upload that does not exist is skipped with a warning and the
//! pages render without it. Pages only ever reference images that were
//! copied in this run.
//!
//! Regenerating overwrites every file at the same path. Renderers are pure,
//! so unchanged input yields byte-identical output.

use crate::storage::{Storage, StorageError};
use crate::themes::{Artifact, RenderContext, ThemeRegistry};
use crate::types::{Business, DEFAULT_THEME};
use sha2::{Digest, Sha256};
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("theme '{theme}' is missing {}", list_artifacts(.missing))]
    MissingArtifacts {
        theme: String,
        missing: Vec<Artifact>,
    },
    #[error("business name '{0}' yields an empty slug")]
    EmptySlug(String),
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

fn list_artifacts(missing: &[Artifact]) -> String {
    missing
        .iter()
        .map(Artifact::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// One written file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    /// Path relative to the site root.
    pub path: String,
    pub bytes: usize,
    /// Hex SHA-256 of the written content.
    pub sha256: String,
}

/// A referenced upload that was not copied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedAsset {
    pub source: String,
    /// Site path the asset would have been copied to.
    pub target: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateReport {
    pub slug: String,
    pub theme: String,
    pub files: Vec<GeneratedFile>,
    pub skipped: Vec<SkippedAsset>,
}

impl GenerateReport {
    pub fn file(&self, path: &str) -> Option<&GeneratedFile> {
        self.files.iter().find(|f| f.path == path)
    }

    pub fn total_bytes(&self) -> usize {
        self.files.iter().map(|f| f.bytes).sum()
    }
}

/// Theme id for a record, with blank meaning the default.
pub fn effective_theme(business: &Business) -> &str {
    let theme = business.theme.trim();
    if theme.is_empty() { DEFAULT_THEME } else { theme }
}

/// `.ext` of a storage key, as stored; empty when there is none.
fn extension(key: &str) -> &str {
    let file = key.rsplit('/').next().unwrap_or(key);
    match file.rfind('.') {
        Some(0) | None => "",
        Some(pos) => &file[pos..],
    }
}

/// Planned image copies: `(source key, site path)`.
struct ImagePlan {
    logo: Option<(String, String)>,
    products: Vec<Option<(String, String)>>,
}

fn plan_images(business: &Business) -> ImagePlan {
    let logo = business.logo_path.as_ref().map(|key| {
        let ext = extension(key).to_ascii_lowercase();
        let ext = if ext.is_empty() { ".jpg".to_string() } else { ext };
        (key.clone(), format!("images/logo{ext}"))
    });
    let products = business
        .products
        .iter()
        .enumerate()
        .map(|(i, p)| {
            p.image_path
                .as_ref()
                .map(|key| (key.clone(), format!("images/product_{i}{}", extension(key))))
        })
        .collect();
    ImagePlan { logo, products }
}

pub struct Generator<'a> {
    sites: &'a dyn Storage,
    uploads: &'a dyn Storage,
    themes: &'a ThemeRegistry,
}

impl<'a> Generator<'a> {
    pub fn new(sites: &'a dyn Storage, uploads: &'a dyn Storage, themes: &'a ThemeRegistry) -> Self {
        Self {
            sites,
            uploads,
            themes,
        }
    }

    pub fn generate(&self, business: &Business) -> Result<GenerateReport, GenerateError> {
        let theme = effective_theme(business);
        let missing = self.themes.missing_artifacts(theme);
        if !missing.is_empty() {
            return Err(GenerateError::MissingArtifacts {
                theme: theme.to_string(),
                missing,
            });
        }
        let Some(bundle) = self.themes.get(theme) else {
            return Err(GenerateError::MissingArtifacts {
                theme: theme.to_string(),
                missing: Artifact::ALL.to_vec(),
            });
        };
        let slug = business.slug();
        if slug.is_empty() {
            return Err(GenerateError::EmptySlug(business.name.clone()));
        }
        info!(slug = %slug, theme, "generating microsite");

        let mut report = GenerateReport {
            slug: slug.clone(),
            theme: theme.to_string(),
            files: Vec::new(),
            skipped: Vec::new(),
        };

        let plan = plan_images(business);
        let logo = match plan.logo {
            Some((source, target)) => self.copy_asset(&slug, source, target, &mut report)?,
            None => None,
        };
        let mut product_images = Vec::with_capacity(plan.products.len());
        for planned in plan.products {
            product_images.push(match planned {
                Some((source, target)) => self.copy_asset(&slug, source, target, &mut report)?,
                None => None,
            });
        }

        let ctx = RenderContext {
            business,
            logo: logo.as_deref(),
            product_images: &product_images,
        };
        for artifact in Artifact::ALL {
            let Some(content) = bundle.render(artifact, &ctx) else {
                continue;
            };
            self.write(&slug, artifact.output_path(), content.as_bytes(), &mut report)?;
        }

        debug!(slug = %slug, files = report.files.len(), "microsite written");
        Ok(report)
    }

    /// Copy one upload into the site. Returns the site path when copied.
    fn copy_asset(
        &self,
        slug: &str,
        source: String,
        target: String,
        report: &mut GenerateReport,
    ) -> Result<Option<String>, GenerateError> {
        if !self.uploads.exists(&source) {
            warn!(slug, source = %source, "referenced image missing; skipping");
            report.skipped.push(SkippedAsset { source, target });
            return Ok(None);
        }
        let bytes = self.uploads.read(&source)?;
        self.write(slug, &target, &bytes, report)?;
        Ok(Some(target))
    }

    fn write(
        &self,
        slug: &str,
        path: &str,
        bytes: &[u8],
        report: &mut GenerateReport,
    ) -> Result<(), GenerateError> {
        self.sites.write(&format!("{slug}/{path}"), bytes)?;
        report.files.push(GeneratedFile {
            path: path.to_string(),
            bytes: bytes.len(),
            sha256: format!("{:x}", Sha256::digest(bytes)),
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use crate::test_helpers::sample_business;
    use crate::themes::ThemeBundle;

    struct Fixture {
        sites: MemoryStorage,
        uploads: MemoryStorage,
        themes: ThemeRegistry,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                sites: MemoryStorage::new(),
                uploads: MemoryStorage::new(),
                themes: ThemeRegistry::builtin(),
            }
        }

        fn generate(&self, business: &Business) -> Result<GenerateReport, GenerateError> {
            Generator::new(&self.sites, &self.uploads, &self.themes).generate(business)
        }

        fn page(&self, path: &str) -> String {
            String::from_utf8(self.sites.read(path).unwrap()).unwrap()
        }
    }

    #[test]
    fn writes_exactly_four_files_without_images() {
        let fx = Fixture::new();
        let report = fx.generate(&sample_business("Shop", &["Mug"])).unwrap();
        assert_eq!(report.slug, "shop");
        assert_eq!(report.theme, "minimal");
        assert_eq!(
            fx.sites.list("shop").unwrap(),
            vec![
                "shop/about.html",
                "shop/assets/style.css",
                "shop/index.html",
                "shop/products.html"
            ]
        );
        assert_eq!(report.files.len(), 4);
    }

    #[test]
    fn copies_images_by_position() {
        let fx = Fixture::new();
        fx.uploads.write("shop_logo_Logo.PNG", b"logo").unwrap();
        fx.uploads.write("shop_product_0_a.jpg", b"a").unwrap();
        fx.uploads.write("shop_product_5_c.WebP", b"c").unwrap();

        let mut b = sample_business("Shop", &["A", "B", "C"]);
        b.logo_path = Some("shop_logo_Logo.PNG".into());
        b.products[0].image_path = Some("shop_product_0_a.jpg".into());
        b.products[2].image_path = Some("shop_product_5_c.WebP".into());

        let report = fx.generate(&b).unwrap();
        assert_eq!(fx.sites.read("shop/images/logo.png").unwrap(), b"logo");
        assert_eq!(fx.sites.read("shop/images/product_0.jpg").unwrap(), b"a");
        assert_eq!(fx.sites.read("shop/images/product_2.WebP").unwrap(), b"c");
        assert!(!fx.sites.exists("shop/images/product_1.jpg"));
        assert_eq!(report.files.len(), 7);

        let products = fx.page("shop/products.html");
        assert!(products.contains(r#"src="images/product_0.jpg""#));
        assert!(products.contains(r#"src="images/product_2.WebP""#));
        assert!(!products.contains("product_1"));
    }

    #[test]
    fn missing_upload_is_skipped() {
        let fx = Fixture::new();
        let mut b = sample_business("Shop", &["A"]);
        b.logo_path = Some("gone.jpg".into());
        b.products[0].image_path = Some("../escape.jpg".into());

        let report = fx.generate(&b).unwrap();
        assert_eq!(report.files.len(), 4);
        assert_eq!(
            report.skipped,
            vec![
                SkippedAsset {
                    source: "gone.jpg".into(),
                    target: "images/logo.jpg".into()
                },
                SkippedAsset {
                    source: "../escape.jpg".into(),
                    target: "images/product_0.jpg".into()
                },
            ]
        );
        assert!(!fx.page("shop/index.html").contains("images/logo"));
    }

    #[test]
    fn missing_artifact_fails_before_any_write() {
        let mut fx = Fixture::new();
        fx.uploads.write("logo.png", b"logo").unwrap();
        fx.themes.register(
            ThemeBundle::new("broken")
                .with(Artifact::Home, |_| "home".into())
                .with(Artifact::Products, |_| "products".into())
                .with(Artifact::About, |_| "about".into()),
        );
        let mut b = sample_business("Shop", &["A"]);
        b.theme = "broken".into();
        b.logo_path = Some("logo.png".into());

        let err = fx.generate(&b).unwrap_err();
        match &err {
            GenerateError::MissingArtifacts { theme, missing } => {
                assert_eq!(theme, "broken");
                assert_eq!(missing, &vec![Artifact::Stylesheet]);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(err.to_string().contains("assets/style.css"));
        assert!(fx.sites.is_empty());
    }

    #[test]
    fn unknown_theme_lists_all_artifacts() {
        let fx = Fixture::new();
        let mut b = sample_business("Shop", &["A"]);
        b.theme = "vaporwave".into();
        let err = fx.generate(&b).unwrap_err();
        assert_eq!(
            err.to_string(),
            "theme 'vaporwave' is missing home (index.html), products (products.html), \
             about (about.html), stylesheet (assets/style.css)"
        );
        assert!(fx.sites.is_empty());
    }

    #[test]
    fn blank_theme_uses_default() {
        let fx = Fixture::new();
        let mut b = sample_business("Shop", &["A"]);
        b.theme = "  ".into();
        assert_eq!(fx.generate(&b).unwrap().theme, "minimal");
        assert!(fx.page("shop/index.html").contains("theme-minimal"));
    }

    #[test]
    fn regeneration_is_byte_identical() {
        let fx = Fixture::new();
        let b = sample_business("Joe's Café!", &["Coffee"]);
        let first = fx.generate(&b).unwrap();
        let index = fx.sites.read("joe_s_caf__/index.html").unwrap();
        let second = fx.generate(&b).unwrap();
        assert_eq!(first, second);
        assert_eq!(fx.sites.read("joe_s_caf__/index.html").unwrap(), index);
    }

    #[test]
    fn regeneration_overwrites_with_new_theme() {
        let fx = Fixture::new();
        let mut b = sample_business("Shop", &["A"]);
        fx.generate(&b).unwrap();
        b.theme = "fancy".into();
        fx.generate(&b).unwrap();
        assert!(fx.page("shop/index.html").contains("theme-fancy"));
        assert_eq!(fx.sites.len(), 4);
    }

    #[test]
    fn report_digests_match_content() {
        let fx = Fixture::new();
        let report = fx.generate(&sample_business("Shop", &["A"])).unwrap();
        let css = report.file("assets/style.css").unwrap();
        let bytes = fx.sites.read("shop/assets/style.css").unwrap();
        assert_eq!(css.bytes, bytes.len());
        assert_eq!(css.sha256, format!("{:x}", Sha256::digest(&bytes)));
        assert_eq!(css.sha256.len(), 64);
        assert_eq!(report.total_bytes(), report.files.iter().map(|f| f.bytes).sum::<usize>());
    }

    #[test]
    fn empty_slug_rejected() {
        let fx = Fixture::new();
        let err = fx.generate(&sample_business("   ", &["A"])).unwrap_err();
        assert!(matches!(err, GenerateError::EmptySlug(_)));
    }

    #[test]
    fn extension_of_keys() {
        assert_eq!(extension("a/b/photo.JPG"), ".JPG");
        assert_eq!(extension("noext"), "");
        assert_eq!(extension(".hidden"), "");
        assert_eq!(extension("dir.v2/photo"), "");
    }
}
