//! The microsite service: one value wiring storage, records, themes and the
//! image backend together.
//!
//! [`Microsites::submit`] is the whole form flow:
//!
//! 1. Validate. A rejected form writes nothing.
//! 2. Store the logo and product uploads through the asset processor.
//! 3. Persist the business with its products in one record-store call.
//! 4. Generate the site, synchronously.
//!
//! Persistence commits before generation. If generation fails the record
//! stays behind without a site; [`SubmitError::Generate`] carries its id and
//! [`Microsites::regenerate`] retries it.
//!
//! Two submissions whose names share a slug share one site directory; the
//! later generation overwrites the earlier. [`Microsites::rebuild_all`]
//! follows the same rule and builds each slug from its newest record.

use crate::assets::{AssetLimits, AssetOutcome, AssetProcessor, AssetRole};
use crate::config::{AppConfig, effective_threads};
use crate::generate::{GenerateError, GenerateReport, Generator};
use crate::imaging::{ImageBackend, RustBackend};
use crate::package::{self, Archive, PackageError};
use crate::records::{JsonRecordStore, MemoryRecordStore, RecordError, RecordStore};
use crate::serve::{self, ServeError, ServedFile};
use crate::storage::{FsStorage, MemoryStorage, Storage, StorageError};
use crate::submission::{SubmissionForm, ValidationError};
use crate::themes::ThemeRegistry;
use crate::types::{Business, NewProduct};
use rayon::prelude::*;
use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Error, Debug)]
pub enum SubmitError {
    #[error("{0}")]
    Validation(#[from] ValidationError),
    #[error("record error: {0}")]
    Record(#[from] RecordError),
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
    #[error("business {id} was saved but its site was not generated: {source}")]
    Generate {
        id: u64,
        #[source]
        source: GenerateError,
    },
}

#[derive(Error, Debug)]
pub enum RegenerateError {
    #[error("record error: {0}")]
    Record(#[from] RecordError),
    #[error("generation error: {0}")]
    Generate(#[from] GenerateError),
}

/// What a successful submission produced.
#[derive(Debug, Clone)]
pub struct Submitted {
    pub slug: String,
    pub business: Business,
    pub logo_asset: Option<AssetOutcome>,
    /// One entry per stored product, `None` where no file was uploaded.
    pub product_assets: Vec<Option<AssetOutcome>>,
    pub report: GenerateReport,
}

/// Result of rebuilding one slug.
#[derive(Debug)]
pub struct Rebuilt {
    pub slug: String,
    /// Record the site was built from.
    pub business_id: u64,
    pub result: Result<GenerateReport, GenerateError>,
}

pub struct Microsites {
    config: AppConfig,
    sites: Box<dyn Storage>,
    uploads: Box<dyn Storage>,
    records: Box<dyn RecordStore>,
    themes: ThemeRegistry,
    backend: Box<dyn ImageBackend>,
}

impl Microsites {
    pub fn new(
        config: AppConfig,
        sites: Box<dyn Storage>,
        uploads: Box<dyn Storage>,
        records: Box<dyn RecordStore>,
    ) -> Self {
        Self {
            config,
            sites,
            uploads,
            records,
            themes: ThemeRegistry::builtin(),
            backend: Box::new(RustBackend::new()),
        }
    }

    /// Filesystem-backed service with directories resolved against `root`.
    pub fn open(root: &Path, config: AppConfig) -> Self {
        let paths = config.paths(root);
        Self::new(
            config,
            Box::new(FsStorage::new(paths.sites)),
            Box::new(FsStorage::new(paths.uploads)),
            Box::new(JsonRecordStore::new(paths.records)),
        )
    }

    /// Fully in-memory service.
    pub fn in_memory(config: AppConfig) -> Self {
        Self::new(
            config,
            Box::new(MemoryStorage::new()),
            Box::new(MemoryStorage::new()),
            Box::new(MemoryRecordStore::new()),
        )
    }

    pub fn with_backend(mut self, backend: Box<dyn ImageBackend>) -> Self {
        self.backend = backend;
        self
    }

    pub fn with_themes(mut self, themes: ThemeRegistry) -> Self {
        self.themes = themes;
        self
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn themes(&self) -> &ThemeRegistry {
        &self.themes
    }

    pub fn sites(&self) -> &dyn Storage {
        self.sites.as_ref()
    }

    pub fn uploads(&self) -> &dyn Storage {
        self.uploads.as_ref()
    }

    fn generator(&self) -> Generator<'_> {
        Generator::new(self.sites.as_ref(), self.uploads.as_ref(), &self.themes)
    }

    pub fn submit(&self, form: SubmissionForm) -> Result<Submitted, SubmitError> {
        let valid = form.validate()?;
        let slug = valid.slug();
        let processor = AssetProcessor::new(
            self.uploads.as_ref(),
            self.backend.as_ref(),
            AssetLimits::from_config(&self.config.images),
        );

        let mut business = valid.business;
        let logo_asset = match &valid.logo {
            Some(logo) => Some(processor.store_image(logo, AssetRole::Logo, &slug)?),
            None => None,
        };
        business.logo_path = logo_asset.as_ref().and_then(|o| o.key()).map(str::to_string);

        let mut product_assets = Vec::with_capacity(valid.products.len());
        for row in valid.products {
            let mut product: NewProduct = row.product;
            let outcome = match &row.image {
                Some(image) => Some(processor.store_image(
                    image,
                    AssetRole::Product(row.form_index),
                    &slug,
                )?),
                None => None,
            };
            product.image_path = outcome.as_ref().and_then(|o| o.key()).map(str::to_string);
            product_assets.push(outcome);
            business.products.push(product);
        }

        let business = self.records.create(business)?;
        info!(id = business.id, slug = %slug, products = business.products.len(), "business saved");

        let report = self
            .generator()
            .generate(&business)
            .map_err(|source| SubmitError::Generate {
                id: business.id,
                source,
            })?;
        Ok(Submitted {
            slug,
            business,
            logo_asset,
            product_assets,
            report,
        })
    }

    /// Generate the site for a stored record.
    pub fn regenerate(&self, id: u64) -> Result<GenerateReport, RegenerateError> {
        let business = self.records.get(id)?;
        Ok(self.generator().generate(&business)?)
    }

    /// Regenerate every site from the newest record for each slug.
    pub fn rebuild_all(&self) -> Result<Vec<Rebuilt>, RecordError> {
        let latest = latest_per_slug(self.records.list()?);
        let generator = self.generator();
        let run = || -> Vec<Rebuilt> {
            latest
                .par_iter()
                .map(|(slug, business)| Rebuilt {
                    slug: slug.clone(),
                    business_id: business.id,
                    result: generator.generate(business),
                })
                .collect()
        };

        let threads = effective_threads(&self.config.processing);
        let rebuilt = match rayon::ThreadPoolBuilder::new().num_threads(threads).build() {
            Ok(pool) => pool.install(run),
            Err(e) => {
                warn!(error = %e, "could not build thread pool; rebuilding on the global pool");
                run()
            }
        };
        Ok(rebuilt)
    }

    pub fn records(&self) -> Result<Vec<Business>, RecordError> {
        self.records.list()
    }

    pub fn site_exists(&self, slug: &str) -> bool {
        serve::site_exists(self.sites.as_ref(), slug)
    }

    pub fn serve(&self, slug: &str, relative: &str) -> Result<ServedFile, ServeError> {
        serve::serve(self.sites.as_ref(), slug, relative)
    }

    pub fn package(&self, slug: &str) -> Result<Archive, PackageError> {
        package::package(self.sites.as_ref(), slug)
    }
}

/// Newest record per slug, ordered by slug. Ties on the timestamp go to the
/// higher id.
fn latest_per_slug(records: Vec<Business>) -> Vec<(String, Business)> {
    let mut latest: BTreeMap<String, Business> = BTreeMap::new();
    for business in records {
        let slug = business.slug();
        if slug.is_empty() {
            continue;
        }
        let newer = latest
            .get(&slug)
            .is_none_or(|seen| (business.created_at, business.id) > (seen.created_at, seen.id));
        if newer {
            latest.insert(slug, business);
        }
    }
    latest.into_iter().collect()
}
