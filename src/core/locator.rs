//! Photo discovery by numeric file-name prefix
//!
//! Photos are expected as `NNNN-<anything>.<ext>` (or `NNNN_...`), where
//! `NNNN` is the 4-digit zero-padded sequence number.
//!
//! # Detection Algorithm
//!
//! 1. Glob the directory for names starting with four digits
//! 2. Sort candidates lexicographically (deterministic across filesystems)
//! 3. Parse the number with a strict regex (exactly 4 digits, separator, known extension)
//! 4. First candidate per number wins; later ones are kept as duplicates
//!
//! Numbers outside `1..=total` are ignored. Absent numbers are not errors.

use log::{debug, info, warn};
use regex::Regex;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use super::error::CollageError;

/// Image extensions accepted by the locator (lowercase)
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "tif", "tiff", "tga"];

/// A located photo
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoRecord {
    pub number: u32,
    pub path: PathBuf,
}

impl PhotoRecord {
    /// File name for display, lossy
    pub fn file_name(&self) -> String {
        display_name(&self.path)
    }
}

/// Result of a directory scan: sequence number -> path
#[derive(Debug, Clone, Default)]
pub struct PhotoIndex {
    records: BTreeMap<u32, PathBuf>,
    total: u32,
    duplicates: Vec<PhotoRecord>,
}

impl PhotoIndex {
    pub fn get(&self, number: u32) -> Option<&Path> {
        self.records.get(&number).map(PathBuf::as_path)
    }

    /// Number of located photos
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Expected photo count (the scan range is `1..=total`)
    pub fn total(&self) -> u32 {
        self.total
    }

    /// Located photos in number order
    pub fn records(&self) -> impl Iterator<Item = PhotoRecord> + '_ {
        self.records.iter().map(|(&number, path)| PhotoRecord {
            number,
            path: path.clone(),
        })
    }

    /// First `n` located photos in number order
    pub fn first(&self, n: usize) -> Vec<PhotoRecord> {
        self.records().take(n).collect()
    }

    /// Expected numbers with no matching file
    pub fn missing(&self) -> impl Iterator<Item = u32> + '_ {
        (1..=self.total).filter(|n| !self.records.contains_key(n))
    }

    /// Candidates that lost the tie-break to a lexicographically earlier file
    pub fn duplicates(&self) -> &[PhotoRecord] {
        &self.duplicates
    }

    fn insert(&mut self, number: u32, path: PathBuf) {
        match self.records.get(&number) {
            Some(winner) => {
                warn!(
                    "Duplicate photo #{:04}: using {}, ignoring {}",
                    number,
                    display_name(winner),
                    display_name(&path)
                );
                self.duplicates.push(PhotoRecord { number, path });
            }
            None => {
                self.records.insert(number, path);
            }
        }
    }
}

fn name_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        let exts = IMAGE_EXTENSIONS.join("|");
        Regex::new(&format!(r"^(\d{{4}})[-_].*\.(?i:{})$", exts))
            .expect("photo name regex is a literal")
    })
}

/// Parse the sequence number from a photo file name.
///
/// `0042-monster.jpg` -> Some(42). Five-digit prefixes, missing separator or
/// unknown extension -> None.
pub fn parse_sequence_number(file_name: &str) -> Option<u32> {
    let caps = name_regex().captures(file_name)?;
    caps.get(1)?.as_str().parse().ok()
}

/// Scan `dir` for photos numbered `1..=total`.
pub fn locate_photos(dir: &Path, total: u32) -> Result<PhotoIndex, CollageError> {
    if !dir.is_dir() {
        return Err(CollageError::SourceMissing(dir.to_path_buf()));
    }

    let escaped = glob::Pattern::escape(&dir.to_string_lossy());
    let pattern = format!("{}/[0-9][0-9][0-9][0-9]*", escaped.trim_end_matches('/'));
    debug!("Scanning with pattern: {}", pattern);

    let paths = glob::glob(&pattern).map_err(|e| CollageError::Glob(e.to_string()))?;

    let mut candidates: Vec<PathBuf> = paths
        .filter_map(|entry| match entry {
            Ok(path) => Some(path),
            Err(e) => {
                warn!("Skipping unreadable entry: {}", e);
                None
            }
        })
        .filter(|p| p.is_file())
        .collect();
    candidates.sort();

    let mut index = PhotoIndex {
        total,
        ..PhotoIndex::default()
    };

    for path in candidates {
        let Some(name) = path.file_name().and_then(|s| s.to_str()) else {
            continue;
        };
        let Some(number) = parse_sequence_number(name) else {
            debug!("Ignoring non-matching file: {}", name);
            continue;
        };
        if number == 0 || number > total {
            debug!("Ignoring out-of-range photo #{:04}: {}", number, name);
            continue;
        }
        index.insert(number, path);
    }

    info!(
        "Located {} of {} photos in {} ({} duplicates ignored)",
        index.len(),
        total,
        dir.display(),
        index.duplicates.len()
    );

    Ok(index)
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn temp_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("gridcollage_locator_{}_{}", name, std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn touch(dir: &Path, name: &str) {
        fs::write(dir.join(name), b"x").unwrap();
    }

    #[test]
    fn test_parse_sequence_number() {
        assert_eq!(parse_sequence_number("0001-goblin.jpg"), Some(1));
        assert_eq!(parse_sequence_number("0600-dragon king.JPG"), Some(600));
        assert_eq!(parse_sequence_number("0042_x.jpeg"), Some(42));
        assert_eq!(parse_sequence_number("0007-.png"), Some(7));
        assert_eq!(parse_sequence_number("00012-x.jpg"), None);
        assert_eq!(parse_sequence_number("0001x-goblin.jpg"), None);
        assert_eq!(parse_sequence_number("0001.jpg"), None);
        assert_eq!(parse_sequence_number("0001-notes.txt"), None);
        assert_eq!(parse_sequence_number("goblin-0001.jpg"), None);
    }

    #[test]
    fn test_locate_with_missing_and_duplicates() {
        let dir = temp_dir("dups");
        touch(&dir, "0001-b.jpg");
        touch(&dir, "0001-a.jpg");
        touch(&dir, "0003-c.png");
        touch(&dir, "0700-out-of-range.jpg");
        touch(&dir, "0000-zero.jpg");
        touch(&dir, "readme.txt");
        fs::create_dir_all(dir.join("0002-folder.jpg")).unwrap();

        let index = locate_photos(&dir, 5).unwrap();
        assert_eq!(index.len(), 2);
        assert_eq!(index.get(1).unwrap().file_name().unwrap(), "0001-a.jpg");
        assert!(index.get(2).is_none());
        assert_eq!(index.get(3).unwrap().file_name().unwrap(), "0003-c.png");
        assert_eq!(index.missing().collect::<Vec<_>>(), vec![2, 4, 5]);
        assert_eq!(index.duplicates().len(), 1);
        assert_eq!(index.duplicates()[0].file_name(), "0001-b.jpg");
        assert_eq!(index.first(1)[0].number, 1);

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_locate_escapes_glob_chars_in_dir() {
        let dir = temp_dir("brackets").join("[set]");
        fs::create_dir_all(&dir).unwrap();
        touch(&dir, "0002-x.jpg");

        let index = locate_photos(&dir, 10).unwrap();
        assert_eq!(index.len(), 1);
        assert!(index.get(2).is_some());

        fs::remove_dir_all(dir.parent().unwrap()).unwrap();
    }

    #[test]
    fn test_locate_missing_dir() {
        let dir = std::env::temp_dir().join("gridcollage_definitely_missing_dir");
        let err = locate_photos(&dir, 10).unwrap_err();
        assert!(matches!(err, CollageError::SourceMissing(_)));
    }
}
