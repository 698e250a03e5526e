//! # Microsite Generator
//!
//! Turns a small business's details and product list into a themed,
//! self-contained static site: a home page, a product listing, an about page
//! and a stylesheet, plus the uploaded logo and product photos. Sites can be
//! previewed, served file by file, or downloaded as a ZIP.
//!
//! # Pipeline
//!
//! ```text
//! form ──validate──▶ uploads ──resize──▶ record ──generate──▶ sites/<slug>/
//!                    (storage)           (store)              │
//!                                                            ├─ serve
//!                                                            └─ package (.zip)
//! ```
//!
//! 1. **Submission** ([`submission`]): raw field values become a validated
//!    business. Nothing is written for a rejected form.
//! 2. **Assets** ([`assets`], [`imaging`]): logo and product uploads are
//!    stored under `<slug>_<category>_<filename>` and downscaled in place.
//!    Unsupported files are skipped; a failed resize keeps the original.
//! 3. **Records** ([`records`]): the business and its products are persisted
//!    in one operation.
//! 4. **Generation** ([`generate`], [`themes`]): the theme is checked for all
//!    four artifacts first, then images are copied and pages rendered.
//!    Regeneration overwrites in place and is byte-for-byte stable.
//! 5. **Serving and packaging** ([`serve`], [`package`]): path-scoped reads
//!    and ZIP archives of a site.
//!
//! [`app::Microsites`] wires these together; [`web`] puts them behind HTTP.
//!
//! # Slugs
//!
//! A business's site directory is [`slug::slugify`] of its name: lowercased,
//! trimmed, with every character outside `[a-zA-Z0-9_-]` replaced by `_`.
//! The mapping is lossy by intent. Names that collide share one directory and
//! the latest generation wins.
//!
//! # Storage
//!
//! All file access goes through the [`storage::Storage`] trait. The binary
//! uses directories on disk; tests and dry runs use the in-memory
//! implementation.

pub mod app;
pub mod assets;
pub mod config;
pub mod generate;
pub mod imaging;
pub mod output;
pub mod package;
pub mod records;
pub mod serve;
pub mod slug;
pub mod storage;
pub mod submission;
pub mod themes;
pub mod types;
pub mod web;

#[cfg(test)]
pub(crate) mod test_helpers;
