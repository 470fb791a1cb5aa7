//! Error types for frame input and configuration loading.

use std::path::PathBuf;

/// Rejected frame input. The runtime treats every variant as "skip this cycle".
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FrameError {
    #[error("frame has zero area ({width}x{height})")]
    EmptyFrame { width: u32, height: u32 },
    #[error("pixel buffer is empty")]
    EmptyBuffer,
    #[error("pixel buffer holds {actual} bytes, expected {expected} for {width}x{height}x{channels}")]
    SizeMismatch {
        width: u32,
        height: u32,
        channels: usize,
        expected: usize,
        actual: usize,
    },
}

/// Errors that can occur while loading a [`crate::ScopeConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}
