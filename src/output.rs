//! CLI output formatting.
//!
//! # Information-First Display
//!
//! Entities lead with their identity (business name and slug, product
//! position and name). Storage keys, sizes and digests follow as indented
//! context lines.
//!
//! # Output Format
//!
//! ## Create
//!
//! ```text
//! #1 Joe's Café! → joe_s_caf__/ (minimal)
//!     Logo: stored joe_s_caf___logo_logo.png
//!     001 Coffee $3.50
//!         Image: stored joe_s_caf___product_0_coffee.jpg
//! index.html (2.1 KB) 5d1f0c2a9b7e
//! products.html (3.4 KB) 9a0b11f3c4d2
//! about.html (1.8 KB) 0c4be8a61f55
//! assets/style.css (1.2 KB) 77ad09e3c210
//! images/logo.png (14.0 KB) c1e2d3f40516
//! Generated 5 files, 22.5 KB
//! ```
//!
//! ## List
//!
//! ```text
//! #1 Joe's Café! → joe_s_caf__/ (minimal, 1 product)
//!     Created: 2024-05-01 12:00:00 UTC
//! ```
//!
//! # Architecture
//!
//! Each report has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure: no I/O, no side effects.

use crate::app::{Rebuilt, Submitted};
use crate::assets::AssetOutcome;
use crate::generate::{GenerateReport, effective_theme};
use crate::package::Archive;
use crate::types::Business;
use std::path::Path;

// ============================================================================
// Shared helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Human-readable byte size.
fn format_size(bytes: usize) -> String {
    if bytes < 1024 {
        format!("{bytes} B")
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}

fn plural(n: usize, one: &str, many: &str) -> String {
    if n == 1 {
        format!("{n} {one}")
    } else {
        format!("{n} {many}")
    }
}

/// `#<id> <name> → <slug>/`
fn business_header(business: &Business) -> String {
    format!("#{} {} → {}/", business.id, business.name, business.slug())
}

fn outcome_line(outcome: &AssetOutcome) -> String {
    match outcome {
        AssetOutcome::Stored { key } => format!("stored {key}"),
        AssetOutcome::StoredUnresized { key, reason } => {
            format!("stored {key} (not resized: {reason})")
        }
        AssetOutcome::Skipped(reason) => format!("skipped ({reason})"),
    }
}

// ============================================================================
// Generate
// ============================================================================

/// One line per written file with its size and short digest, then totals.
pub fn format_generate_report(report: &GenerateReport) -> Vec<String> {
    let mut lines: Vec<String> = report
        .files
        .iter()
        .map(|f| {
            let short = f.sha256.get(..12).unwrap_or(&f.sha256);
            format!("{} ({}) {}", f.path, format_size(f.bytes), short)
        })
        .collect();
    for skipped in &report.skipped {
        lines.push(format!(
            "{} skipped: {} not found",
            skipped.target, skipped.source
        ));
    }
    lines.push(format!(
        "Generated {}, {}",
        plural(report.files.len(), "file", "files"),
        format_size(report.total_bytes())
    ));
    lines
}

pub fn print_generate_report(report: &GenerateReport) {
    for line in format_generate_report(report) {
        println!("{}", line);
    }
}

// ============================================================================
// Create
// ============================================================================

pub fn format_submit_output(submitted: &Submitted) -> Vec<String> {
    let business = &submitted.business;
    let mut lines = vec![format!(
        "{} ({})",
        business_header(business),
        submitted.report.theme
    )];

    if let Some(outcome) = &submitted.logo_asset {
        lines.push(format!("{}Logo: {}", indent(1), outcome_line(outcome)));
    }
    for (i, product) in business.products.iter().enumerate() {
        lines.push(format!(
            "{}{} {} ${}",
            indent(1),
            format_index(i + 1),
            product.name,
            product.display_price()
        ));
        if let Some(Some(outcome)) = submitted.product_assets.get(i) {
            lines.push(format!("{}Image: {}", indent(2), outcome_line(outcome)));
        }
    }

    lines.extend(format_generate_report(&submitted.report));
    lines
}

pub fn print_submit_output(submitted: &Submitted) {
    for line in format_submit_output(submitted) {
        println!("{}", line);
    }
}

// ============================================================================
// Rebuild
// ============================================================================

pub fn format_rebuild_output(rebuilt: &[Rebuilt]) -> Vec<String> {
    let mut lines = Vec::new();
    let mut failed = 0;
    for r in rebuilt {
        match &r.result {
            Ok(report) => lines.push(format!(
                "{}/ from #{} ({}, {})",
                r.slug,
                r.business_id,
                report.theme,
                plural(report.files.len(), "file", "files")
            )),
            Err(e) => {
                failed += 1;
                lines.push(format!("{}/ from #{} FAILED", r.slug, r.business_id));
                lines.push(format!("{}{}", indent(1), e));
            }
        }
    }
    lines.push(format!(
        "Rebuilt {}, {} failed",
        plural(rebuilt.len() - failed, "site", "sites"),
        failed
    ));
    lines
}

pub fn print_rebuild_output(rebuilt: &[Rebuilt]) {
    for line in format_rebuild_output(rebuilt) {
        println!("{}", line);
    }
}

// ============================================================================
// List
// ============================================================================

pub fn format_record_list(records: &[Business]) -> Vec<String> {
    if records.is_empty() {
        return vec!["No microsites yet".to_string()];
    }
    let mut lines = Vec::new();
    for business in records {
        lines.push(format!(
            "{} ({}, {})",
            business_header(business),
            effective_theme(business),
            plural(business.products.len(), "product", "products")
        ));
        lines.push(format!(
            "{}Created: {}",
            indent(1),
            business.created_at.format("%Y-%m-%d %H:%M:%S UTC")
        ));
    }
    lines
}

pub fn print_record_list(records: &[Business]) {
    for line in format_record_list(records) {
        println!("{}", line);
    }
}

// ============================================================================
// Package
// ============================================================================

pub fn format_package_output(archive: &Archive, written_to: &Path) -> Vec<String> {
    vec![format!(
        "{} ({}, {})",
        written_to.display(),
        plural(archive.entries, "entry", "entries"),
        format_size(archive.bytes.len())
    )]
}

pub fn print_package_output(archive: &Archive, written_to: &Path) {
    for line in format_package_output(archive, written_to) {
        println!("{}", line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::SkipReason;
    use crate::generate::{GenerateError, GeneratedFile, SkippedAsset};
    use crate::test_helpers::sample_business;

    fn report(files: &[(&str, usize)]) -> GenerateReport {
        GenerateReport {
            slug: "shop".into(),
            theme: "minimal".into(),
            files: files
                .iter()
                .map(|(path, bytes)| GeneratedFile {
                    path: path.to_string(),
                    bytes: *bytes,
                    sha256: "0123456789abcdef".repeat(4),
                })
                .collect(),
            skipped: Vec::new(),
        }
    }

    #[test]
    fn format_size_units() {
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(2048), "2.0 KB");
        assert_eq!(format_size(3 * 1024 * 1024), "3.0 MB");
    }

    #[test]
    fn generate_report_lines() {
        let mut r = report(&[("index.html", 100), ("assets/style.css", 2048)]);
        r.skipped.push(SkippedAsset {
            source: "gone.jpg".into(),
            target: "images/logo.jpg".into(),
        });
        assert_eq!(
            format_generate_report(&r),
            vec![
                "index.html (100 B) 0123456789ab",
                "assets/style.css (2.0 KB) 0123456789ab",
                "images/logo.jpg skipped: gone.jpg not found",
                "Generated 2 files, 2.1 KB",
            ]
        );
    }

    #[test]
    fn submit_output_lists_products_and_assets() {
        let mut business = sample_business("Shop", &["Mug", "Cup", "Bowl"]);
        business.logo_path = Some("shop_logo_l.png".into());
        business.products[0].image_path = Some("shop_product_0_m.jpg".into());
        let submitted = Submitted {
            slug: "shop".into(),
            business,
            logo_asset: Some(AssetOutcome::Stored {
                key: "shop_logo_l.png".into(),
            }),
            product_assets: vec![
                Some(AssetOutcome::Stored {
                    key: "shop_product_0_m.jpg".into(),
                }),
                Some(AssetOutcome::Skipped(SkipReason::UnsupportedExtension(
                    "c.bmp".into(),
                ))),
                None,
            ],
            report: report(&[("index.html", 10)]),
        };
        let lines = format_submit_output(&submitted);
        assert_eq!(
            &lines[..6],
            &[
                "#1 Shop → shop/ (minimal)",
                "    Logo: stored shop_logo_l.png",
                "    001 Mug $1.00",
                "        Image: stored shop_product_0_m.jpg",
                "    002 Cup $2.00",
                "        Image: skipped (unsupported file type: c.bmp)",
            ]
        );
        assert_eq!(lines[6], "    003 Bowl $3.00");
    }

    #[test]
    fn rebuild_output_counts_failures() {
        let rebuilt = vec![
            Rebuilt {
                slug: "a".into(),
                business_id: 1,
                result: Ok(report(&[("index.html", 1)])),
            },
            Rebuilt {
                slug: "b".into(),
                business_id: 2,
                result: Err(GenerateError::EmptySlug(String::new())),
            },
        ];
        let lines = format_rebuild_output(&rebuilt);
        assert_eq!(lines[0], "a/ from #1 (minimal, 1 file)");
        assert_eq!(lines[1], "b/ from #2 FAILED");
        assert_eq!(lines.last().unwrap(), "Rebuilt 1 site, 1 failed");
    }

    #[test]
    fn record_list_empty_and_populated() {
        assert_eq!(format_record_list(&[]), vec!["No microsites yet"]);
        let lines = format_record_list(&[sample_business("Joe's Café!", &["Coffee"])]);
        assert_eq!(
            lines,
            vec![
                "#1 Joe's Café! → joe_s_caf__/ (minimal, 1 product)",
                "    Created: 2024-05-01 12:00:00 UTC",
            ]
        );
    }

    #[test]
    fn package_output_line() {
        let archive = Archive {
            filename: "shop_microsite.zip".into(),
            bytes: vec![0; 2048],
            entries: 4,
        };
        assert_eq!(
            format_package_output(&archive, Path::new("out/shop_microsite.zip")),
            vec!["out/shop_microsite.zip (4 entries, 2.0 KB)"]
        );
    }
}
