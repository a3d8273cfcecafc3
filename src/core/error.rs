//! Error type shared by the collage pipeline stages.

use std::path::PathBuf;

/// Collage pipeline errors
#[derive(Debug)]
pub enum CollageError {
    Io(std::io::Error),
    Image(image::ImageError),
    /// Settings that cannot produce a usable grid
    Config(String),
    SourceMissing(PathBuf),
    Glob(String),
    /// Decoded image with zero width or height
    EmptyImage,
}

impl std::fmt::Display for CollageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CollageError::Io(e) => write!(f, "IO error: {}", e),
            CollageError::Image(e) => write!(f, "Image error: {}", e),
            CollageError::Config(e) => write!(f, "Invalid settings: {}", e),
            CollageError::SourceMissing(p) => write!(f, "Photos folder not found: {}", p.display()),
            CollageError::Glob(e) => write!(f, "Glob error: {}", e),
            CollageError::EmptyImage => write!(f, "Image has zero width or height"),
        }
    }
}

impl std::error::Error for CollageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CollageError::Io(e) => Some(e),
            CollageError::Image(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for CollageError {
    fn from(e: std::io::Error) -> Self {
        CollageError::Io(e)
    }
}

impl From<image::ImageError> for CollageError {
    fn from(e: image::ImageError) -> Self {
        CollageError::Image(e)
    }
}

/// Shorten an error message for the failure list (char-safe)
pub fn truncate_message(msg: &str, max_chars: usize) -> String {
    msg.chars().take(max_chars).collect()
}
