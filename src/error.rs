//! Errors surfaced by the codec and the editor session.

use std::path::PathBuf;

use crate::common::ColorIdx;

#[derive(Debug, thiserror::Error)]
pub enum EditorError {
    #[error("File not found or unreadable: {}", path.display())]
    NotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Not an 8-bit uncompressed indexed bitmap: {0}")]
    CorruptFormat(String),

    #[error("Color index {index} out of range (palette has {palette_len} entries)")]
    InvalidIndex { index: ColorIdx, palette_len: usize },

    #[error("Failed to write {}: {source}", path.display())]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("No character is currently loaded")]
    NothingOpen,
}

pub type Result<T> = std::result::Result<T, EditorError>;

pub(crate) fn corrupt(msg: impl Into<String>) -> EditorError {
    EditorError::CorruptFormat(msg.into())
}
