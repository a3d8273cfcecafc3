//! Batch runner: drives grid assignment, compositing and writing per collage
//!
//! Each collage goes empty canvas -> filled -> written, then is dropped.
//! Per-photo problems (missing file, decode error) only blank that cell;
//! failing to write a collage aborts the batch.

use anyhow::{Context, Result};
use image::RgbImage;
use log::{debug, info};
use std::path::{Path, PathBuf};

use super::compositor::{new_canvas, place_photo};
use super::error::truncate_message;
use super::grid::{self, GridGeometry, PHOTOS_PER_COLLAGE};
use super::locator::PhotoIndex;
use super::writer::{collage_file_name, write_collage};
use crate::config::CollageSettings;
use crate::progress::CollageProgress;

/// Max chars kept from a per-photo error message
pub const ERROR_MESSAGE_LEN: usize = 50;

/// Why a cell was left blank
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    /// No file for this number
    Missing,
    /// File found but could not be loaded (truncated message)
    Error(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoFailure {
    pub number: u32,
    /// None for missing photos
    pub file_name: Option<String>,
    pub kind: FailureKind,
}

impl PhotoFailure {
    pub fn is_missing(&self) -> bool {
        self.kind == FailureKind::Missing
    }
}

/// Outcome of one collage
#[derive(Debug, Clone)]
pub struct CollageReport {
    /// 1-based collage number
    pub collage: u32,
    pub first: u32,
    pub last: u32,
    pub placed: u32,
    pub failures: Vec<PhotoFailure>,
    pub output: PathBuf,
    /// Written file size
    pub bytes: u64,
}

impl CollageReport {
    pub fn missing(&self) -> impl Iterator<Item = &PhotoFailure> {
        self.failures.iter().filter(|f| f.is_missing())
    }

    pub fn errors(&self) -> impl Iterator<Item = &PhotoFailure> {
        self.failures.iter().filter(|f| !f.is_missing())
    }
}

/// Outcome of the whole batch
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    /// Photos located by the scan
    pub found: usize,
    /// Photos expected
    pub total: u32,
    pub collages: Vec<CollageReport>,
}

impl BatchReport {
    pub fn placed(&self) -> u32 {
        self.collages.iter().map(|c| c.placed).sum()
    }

    pub fn failures(&self) -> impl Iterator<Item = &PhotoFailure> {
        self.collages.iter().flat_map(|c| c.failures.iter())
    }

    pub fn missing_count(&self) -> usize {
        self.failures().filter(|f| f.is_missing()).count()
    }

    pub fn error_count(&self) -> usize {
        self.failures().filter(|f| !f.is_missing()).count()
    }
}

/// Composited canvas plus its tallies, before writing
pub struct RenderedCollage {
    pub canvas: RgbImage,
    pub placed: u32,
    pub failures: Vec<PhotoFailure>,
}

/// Validated settings plus derived geometry for one run
#[derive(Debug, Clone)]
pub struct CollageBatch {
    settings: CollageSettings,
    geometry: GridGeometry,
}

impl CollageBatch {
    pub fn new(settings: CollageSettings) -> Result<Self> {
        settings.validate().context("Invalid collage settings")?;
        let geometry = settings.geometry()?;
        Ok(Self { settings, geometry })
    }

    pub fn settings(&self) -> &CollageSettings {
        &self.settings
    }

    pub fn geometry(&self) -> &GridGeometry {
        &self.geometry
    }

    /// Output path for a 1-based collage number
    pub fn output_path(&self, collage: u32) -> PathBuf {
        let (first, last) = grid::collage_range(collage);
        self.settings
            .output_dir
            .join(collage_file_name(&self.settings.file_prefix, first, last))
    }

    /// Fill one collage canvas. Never fails: problems are recorded per photo.
    pub fn render_collage(&self, collage: u32, index: &PhotoIndex, progress: &CollageProgress) -> RenderedCollage {
        let (first, last) = grid::collage_range(collage);
        let mut canvas = new_canvas(&self.geometry, self.settings.background);
        let mut placed = 0;
        let mut failures = Vec::new();

        for number in first..=last {
            let Some(slot) = grid::slot(number) else {
                continue;
            };
            let placement = self.geometry.placement(slot);

            let Some(path) = index.get(number) else {
                // Missing photos stay blank and are only summarised
                failures.push(PhotoFailure {
                    number,
                    file_name: None,
                    kind: FailureKind::Missing,
                });
                progress.photo_done(None);
                continue;
            };

            let name = file_name(path);
            match place_photo(&mut canvas, path, placement) {
                Ok(()) => placed += 1,
                Err(e) => {
                    let message = truncate_message(&e.to_string(), ERROR_MESSAGE_LEN);
                    // Shown on the console once, via the progress bars
                    debug!("Photo #{:04} ({}) skipped: {}", number, name, e);
                    progress.println(&format!(
                        "  ✗ {:3}/{}: Error - {}",
                        number - first + 1,
                        PHOTOS_PER_COLLAGE,
                        truncate_message(&name, 40)
                    ));
                    failures.push(PhotoFailure {
                        number,
                        file_name: Some(name.clone()),
                        kind: FailureKind::Error(message),
                    });
                }
            }
            progress.photo_done(Some(name.as_str()));
        }

        RenderedCollage {
            canvas,
            placed,
            failures,
        }
    }

    /// Run all collages in order.
    ///
    /// `on_collage` is called after each collage is written.
    pub fn run(
        &self,
        index: &PhotoIndex,
        progress: &mut CollageProgress,
        mut on_collage: impl FnMut(&CollageReport),
    ) -> Result<BatchReport> {
        let collages = self.settings.collages;
        let mut report = BatchReport {
            found: index.len(),
            total: self.settings.total_photos(),
            collages: Vec::with_capacity(collages as usize),
        };

        for collage in 1..=collages {
            let (first, last) = grid::collage_range(collage);
            progress.start(
                &format!("🖼️  Collage {}/{}: photos {:04}-{:04}", collage, collages, first, last),
                PHOTOS_PER_COLLAGE as u64,
            );

            let rendered = self.render_collage(collage, index, progress);
            progress.finish();

            let output = self.output_path(collage);
            let bytes = write_collage(&rendered.canvas, &output, self.settings.quality)
                .with_context(|| format!("Failed to write collage {}", output.display()))?;

            info!(
                "Collage {}/{}: placed {}, blank {}",
                collage,
                collages,
                rendered.placed,
                rendered.failures.len()
            );

            let collage_report = CollageReport {
                collage,
                first,
                last,
                placed: rendered.placed,
                failures: rendered.failures,
                output,
                bytes,
            };
            on_collage(&collage_report);
            report.collages.push(collage_report);

            // Cosmetic pacing between collages
            if collage < collages && !self.settings.pause().is_zero() {
                std::thread::sleep(self.settings.pause());
            }
        }

        Ok(report)
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::locator::locate_photos;
    use image::Rgb;
    use std::fs;

    const FILL: Rgb<u8> = Rgb([10, 200, 30]);
    const WHITE: Rgb<u8> = Rgb([255, 255, 255]);

    struct Fixture {
        root: PathBuf,
        photos: PathBuf,
        output: PathBuf,
    }

    impl Fixture {
        fn new(name: &str) -> Self {
            let root = std::env::temp_dir().join(format!("gridcollage_runner_{}_{}", name, std::process::id()));
            let _ = fs::remove_dir_all(&root);
            let photos = root.join("photos");
            let output = root.join("collages");
            fs::create_dir_all(&photos).unwrap();
            Self { root, photos, output }
        }

        /// Small canvas: 6x4 px cells
        fn settings(&self, collages: u32) -> CollageSettings {
            CollageSettings {
                source_dir: self.photos.clone(),
                output_dir: self.output.clone(),
                canvas_width: 126,
                canvas_height: 106,
                collages,
                pause_ms: 0,
                ..Default::default()
            }
        }

        fn add_photo(&self, number: u32) {
            let img = RgbImage::from_pixel(12, 8, FILL);
            img.save(self.photos.join(format!("{:04}-photo.png", number))).unwrap();
        }
    }

    impl Drop for Fixture {
        fn drop(&mut self) {
            let _ = fs::remove_dir_all(&self.root);
        }
    }

    fn cell_is(canvas: &RgbImage, geometry: &GridGeometry, number: u32, color: Rgb<u8>) -> bool {
        let p = geometry.placement(grid::slot(number).unwrap());
        (p.y..p.y + p.height).all(|y| (p.x..p.x + p.width).all(|x| *canvas.get_pixel(x, y) == color))
    }

    #[test]
    fn test_missing_photo_leaves_blank_cell() {
        let fx = Fixture::new("missing");
        for n in 1..=100 {
            if n != 37 {
                fx.add_photo(n);
            }
        }

        let batch = CollageBatch::new(fx.settings(1)).unwrap();
        let index = locate_photos(&fx.photos, 100).unwrap();
        let rendered = batch.render_collage(1, &index, &CollageProgress::hidden());

        assert_eq!(rendered.placed, 99);
        assert_eq!(rendered.failures.len(), 1);
        assert_eq!(rendered.failures[0].number, 37);
        assert!(rendered.failures[0].is_missing());

        let geo = batch.geometry();
        assert!(cell_is(&rendered.canvas, geo, 37, WHITE));
        assert!(cell_is(&rendered.canvas, geo, 36, FILL));
        assert!(cell_is(&rendered.canvas, geo, 38, FILL));
        assert!(cell_is(&rendered.canvas, geo, 27, FILL));
        assert!(cell_is(&rendered.canvas, geo, 47, FILL));
        // Padding stays background
        assert_eq!(*rendered.canvas.get_pixel(0, 0), WHITE);
    }

    #[test]
    fn test_full_batch_writes_six_collages() {
        let fx = Fixture::new("full");
        for n in 1..=600 {
            fx.add_photo(n);
        }

        let batch = CollageBatch::new(fx.settings(6)).unwrap();
        let index = locate_photos(&fx.photos, 600).unwrap();
        let mut seen = Vec::new();
        let report = batch
            .run(&index, &mut CollageProgress::hidden(), |c| seen.push(c.collage))
            .unwrap();

        assert_eq!(seen, vec![1, 2, 3, 4, 5, 6]);
        assert_eq!(report.found, 600);
        assert_eq!(report.placed(), 600);
        assert_eq!(report.missing_count(), 0);
        assert_eq!(report.error_count(), 0);

        let mut names: Vec<String> = fs::read_dir(&fx.output)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
            .collect();
        names.sort();
        assert_eq!(
            names,
            vec![
                "collage_0001-0100.jpg",
                "collage_0101-0200.jpg",
                "collage_0201-0300.jpg",
                "collage_0301-0400.jpg",
                "collage_0401-0500.jpg",
                "collage_0501-0600.jpg",
            ]
        );
        for c in &report.collages {
            assert_eq!(c.placed, 100);
            assert!(c.bytes > 0);
            let img = image::open(&c.output).unwrap();
            assert_eq!((img.width(), img.height()), (126, 106));
        }
    }

    #[test]
    fn test_corrupt_photo_is_counted_and_skipped() {
        let fx = Fixture::new("corrupt");
        for n in 1..=200 {
            fx.add_photo(n);
        }
        // Overwrite #150 with garbage
        fs::write(fx.photos.join("0150-photo.png"), b"\x00\x01garbage").unwrap();

        let batch = CollageBatch::new(fx.settings(2)).unwrap();
        let index = locate_photos(&fx.photos, 200).unwrap();
        let report = batch.run(&index, &mut CollageProgress::hidden(), |_| {}).unwrap();

        assert_eq!(report.placed(), 199);
        assert_eq!(report.error_count(), 1);
        assert_eq!(report.missing_count(), 0);
        assert_eq!(report.collages.len(), 2);
        assert_eq!(report.collages[0].placed, 100);
        assert_eq!(report.collages[1].placed, 99);

        let failure = report.collages[1].errors().next().unwrap();
        assert_eq!(failure.number, 150);
        assert_eq!(failure.file_name.as_deref(), Some("0150-photo.png"));
        match &failure.kind {
            FailureKind::Error(msg) => assert!(msg.chars().count() <= ERROR_MESSAGE_LEN),
            FailureKind::Missing => panic!("expected decode error"),
        }
    }

    #[test]
    fn test_empty_source_still_writes_blank_collage() {
        let fx = Fixture::new("empty");
        let batch = CollageBatch::new(fx.settings(1)).unwrap();
        let index = locate_photos(&fx.photos, 100).unwrap();
        let report = batch.run(&index, &mut CollageProgress::hidden(), |_| {}).unwrap();

        assert_eq!(report.placed(), 0);
        assert_eq!(report.missing_count(), 100);
        assert!(batch.output_path(1).is_file());
    }

    #[test]
    fn test_invalid_settings_rejected() {
        let settings = CollageSettings {
            canvas_width: 20,
            ..Default::default()
        };
        assert!(CollageBatch::new(settings).is_err());
    }
}
