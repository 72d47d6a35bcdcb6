use std::path::PathBuf;
use thiserror::Error;

/// Result alias used by the pure pipeline and the loaders.
pub type RevolveResult<T> = Result<T, RevolveError>;

/// Failures of a single revolve run. None of them are recovered internally;
/// the first one aborts the case.
#[derive(Debug, Error)]
pub enum RevolveError {
    /// An input path could not be decoded to a grayscale raster.
    #[error("failed to read grayscale image from {}", path.display())]
    FileNotReadable {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// Two arrays that must share (rows, cols) do not.
    #[error("shape mismatch: expected {expected:?} (rows, cols), got {actual:?}")]
    ShapeMismatch {
        expected: (usize, usize),
        actual: (usize, usize),
    },

    #[error("invalid parameter `{name}`: {value}")]
    InvalidParameter { name: &'static str, value: f64 },

    #[error("empty input: image has {rows} rows and {cols} columns")]
    EmptyInput { rows: usize, cols: usize },

    #[error("could not parse configuration: {0}")]
    Config(#[from] toml::de::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
