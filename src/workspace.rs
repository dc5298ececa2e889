// Finding the character files of a workspace directory.
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use itertools::Itertools;
use log::{info, warn};

pub const FILE_PREFIX: &str = "char";
pub const FILE_EXTENSION: &str = "bmp";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CharacterEntry {
    pub index: usize,
    pub path: PathBuf,
}

pub fn file_name(index: usize) -> String {
    format!("{}{:04}.{}", FILE_PREFIX, index, FILE_EXTENSION)
}

fn parse_index(path: &Path) -> Option<usize> {
    path.file_stem()?
        .to_str()?
        .strip_prefix(FILE_PREFIX)?
        .parse()
        .ok()
}

/// Lists `char*.bmp` files in `dir`, sorted by file name. Files whose name
/// does not carry a number get their 1-based position instead.
pub fn discover(dir: &Path) -> Result<Vec<CharacterEntry>> {
    let dir_str = dir.to_str().context("workspace path is not valid UTF-8")?;
    let pattern = format!(
        "{}/{}*.{}",
        glob::Pattern::escape(dir_str),
        FILE_PREFIX,
        FILE_EXTENSION
    );
    let mut paths = vec![];
    for entry in glob::glob(&pattern)? {
        paths.push(entry?);
    }
    let entries: Vec<CharacterEntry> = paths
        .into_iter()
        .sorted_by(|a, b| a.file_name().cmp(&b.file_name()))
        .enumerate()
        .map(|(i, path)| {
            let index = parse_index(&path).unwrap_or_else(|| {
                warn!("No index in {}, using position {}", path.display(), i + 1);
                i + 1
            });
            CharacterEntry { index, path }
        })
        .collect();
    info!("Found {} character files in {}", entries.len(), dir.display());
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn file_names_are_zero_padded() {
        assert_eq!(file_name(1), "char0001.bmp");
        assert_eq!(file_name(123), "char0123.bmp");
    }

    #[test]
    fn discovers_sorted_entries() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["char0003.bmp", "char0001.bmp", "char0002.bmp", "notes.txt", "font.bmp"] {
            fs::write(dir.path().join(name), b"").unwrap();
        }
        let entries = discover(dir.path()).unwrap();
        let indices: Vec<usize> = entries.iter().map(|e| e.index).collect();
        assert_eq!(indices, vec![1, 2, 3]);
        assert_eq!(entries[0].path, dir.path().join("char0001.bmp"));
    }

    #[test]
    fn unnumbered_files_use_position() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["char0001.bmp", "char_big.bmp"] {
            fs::write(dir.path().join(name), b"").unwrap();
        }
        let entries = discover(dir.path()).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].index, 1);
        assert_eq!(entries[1].index, 2);
    }

    #[test]
    fn empty_directory() {
        let dir = tempfile::tempdir().unwrap();
        assert!(discover(dir.path()).unwrap().is_empty());
    }
}
