//! Console report: banner, per-collage results and final summary
//!
//! Lines are built as strings first so they can be tested;
//! `print_lines` writes them to stdout. This is human-readable output, not a
//! machine contract.

use std::path::Path;

use crate::config::CollageSettings;
use crate::core::grid::{GRID_COLS, GRID_ROWS, GridGeometry, PHOTOS_PER_COLLAGE};
use crate::core::locator::PhotoIndex;
use crate::core::runner::{BatchReport, CollageReport, FailureKind};
use crate::core::writer::size_mb;

const RULE_WIDTH: usize = 60;
/// Located photos listed after the scan
const PREVIEW_COUNT: usize = 5;
/// Missing numbers listed per collage
const COLLAGE_MISSING_LIMIT: usize = 10;
/// Missing numbers listed in the final summary
const SUMMARY_MISSING_LIMIT: usize = 20;
/// Error lines listed in the final summary
const SUMMARY_ERROR_LIMIT: usize = 5;

fn rule() -> String {
    "=".repeat(RULE_WIDTH)
}

fn format_numbers(numbers: &[u32]) -> String {
    let parts: Vec<String> = numbers.iter().map(|n| n.to_string()).collect();
    format!("[{}]", parts.join(", "))
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

/// Effective configuration shown before any work starts
pub fn banner_lines(settings: &CollageSettings, geometry: &GridGeometry) -> Vec<String> {
    vec![
        "🎨 Grid Collage Batch Generator".to_string(),
        rule(),
        format!(
            "Creating {} collages ({} photos total)",
            settings.collages,
            settings.total_photos()
        ),
        format!("Canvas: {}x{}", geometry.canvas_width, geometry.canvas_height),
        format!(
            "Grid: {}x{} = {} photos per collage",
            GRID_ROWS, GRID_COLS, PHOTOS_PER_COLLAGE
        ),
        format!(
            "Each photo: {}x{} (crop to fill)",
            geometry.cell_width, geometry.cell_height
        ),
        format!("Border: {}px between photos", geometry.border),
        format!("Outer padding: {}px around edges", geometry.padding),
        format!("Photos folder: {}", settings.source_dir.display()),
        format!("Output folder: {}", settings.output_dir.display()),
        String::new(),
    ]
}

/// Scan result with the first few located photos
pub fn scan_lines(index: &PhotoIndex) -> Vec<String> {
    let mut lines = vec![format!(
        "✅ Found {} photos out of {}",
        index.len(),
        index.total()
    )];
    let preview = index.first(PREVIEW_COUNT);
    if !preview.is_empty() {
        lines.push(String::new());
        lines.push(format!("First {} photos found:", preview.len()));
        for record in preview {
            lines.push(format!("  {:04}: {}", record.number, record.file_name()));
        }
    }
    if !index.duplicates().is_empty() {
        lines.push(format!(
            "⚠️  {} duplicate file(s) ignored (first by name wins)",
            index.duplicates().len()
        ));
    }
    lines.push(String::new());
    lines
}

/// Result lines for one finished collage
pub fn collage_lines(report: &CollageReport, total_collages: u32) -> Vec<String> {
    let mut lines = vec![
        rule(),
        format!(
            "🖼️  COLLAGE {}/{}: Photos {:04}-{:04}",
            report.collage, total_collages, report.first, report.last
        ),
        rule(),
        format!("  ✅ Placed: {} photos", report.placed),
    ];
    if !report.failures.is_empty() {
        lines.push(format!("  ⚠️  Missing/Failed: {} photos", report.failures.len()));
        let missing: Vec<u32> = report
            .missing()
            .map(|f| f.number)
            .take(COLLAGE_MISSING_LIMIT)
            .collect();
        if !missing.is_empty() {
            lines.push(format!("     Missing: {}", format_numbers(&missing)));
        }
    }
    lines.push(format!(
        "  💾 Saved: {} ({:.2} MB)",
        file_name(&report.output),
        size_mb(report.bytes)
    ));
    lines.push(String::new());
    lines
}

/// Final summary after all collages
pub fn summary_lines(report: &BatchReport, output_dir: &Path) -> Vec<String> {
    let mut lines = vec![
        rule(),
        "🎉 ALL COLLAGES COMPLETE!".to_string(),
        rule(),
        format!("✅ Total photos placed: {}/{}", report.placed(), report.total),
    ];

    let failed = report.missing_count() + report.error_count();
    if failed > 0 {
        lines.push(format!("⚠️  Total missing/failed: {}", failed));
    }

    lines.push(String::new());
    lines.push(format!("📁 Output location: {}/", output_dir.display()));
    lines.push("   Files created:".to_string());
    for collage in &report.collages {
        lines.push(format!(
            "   ✓ {} ({:.2} MB)",
            file_name(&collage.output),
            size_mb(collage.bytes)
        ));
    }

    if failed > 0 {
        lines.push(String::new());
        lines.push(format!("⚠️  Missing/Failed photos ({} total):", failed));

        let missing: Vec<u32> = report
            .failures()
            .filter(|f| f.is_missing())
            .map(|f| f.number)
            .collect();
        if !missing.is_empty() {
            let shown = &missing[..missing.len().min(SUMMARY_MISSING_LIMIT)];
            lines.push(format!("   Not found: {}", format_numbers(shown)));
            if missing.len() > SUMMARY_MISSING_LIMIT {
                lines.push(format!(
                    "   ... and {} more missing",
                    missing.len() - SUMMARY_MISSING_LIMIT
                ));
            }
        }

        let errors: Vec<_> = report.failures().filter(|f| !f.is_missing()).collect();
        if !errors.is_empty() {
            lines.push(format!("   Errors: {} photos", errors.len()));
            for failure in errors.iter().take(SUMMARY_ERROR_LIMIT) {
                let name: String = failure
                    .file_name
                    .as_deref()
                    .unwrap_or("N/A")
                    .chars()
                    .take(30)
                    .collect();
                let message = match &failure.kind {
                    FailureKind::Error(msg) => msg.as_str(),
                    FailureKind::Missing => "Not found",
                };
                lines.push(format!("      #{:04} ({}): {}", failure.number, name, message));
            }
        }
    }

    lines.push(String::new());
    lines.push(format!(
        "🎊 Done! {} collage(s) are ready in '{}'.",
        report.collages.len(),
        output_dir.display()
    ));
    lines
}

pub fn print_lines(lines: &[String]) {
    for line in lines {
        println!("{}", line);
    }
}
