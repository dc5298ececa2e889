// The editor session: the currently open character plus its edit history.
use std::path::Path;

use log::{info, warn};

use crate::{
    bmp::{self, CharacterAsset},
    common::{ColorIdx, PixelCoord},
    error::{EditorError, Result},
};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PixelEdit {
    pub x: PixelCoord,
    pub y: PixelCoord,
    pub previous: ColorIdx,
}

// A stroke is every pixel changed between a button press and its release,
// undone as one step.
type Stroke = Vec<PixelEdit>;

#[derive(Default)]
pub struct EditorSession {
    asset: Option<CharacterAsset>,
    pending: Stroke,
    undo_stack: Vec<Stroke>,
    modified: bool,
}

impl EditorSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads `path`, replacing the open character. On failure the session
    /// is left exactly as it was.
    pub fn open(&mut self, path: &Path) -> Result<&CharacterAsset> {
        let asset = bmp::decode(path)?;
        if self.modified {
            if let Some(old) = &self.asset {
                warn!("Discarding unsaved edits to {}", old.path().display());
            }
        }
        self.pending.clear();
        self.undo_stack.clear();
        self.modified = false;
        Ok(&*self.asset.insert(asset))
    }

    pub fn close(&mut self) {
        self.asset = None;
        self.pending.clear();
        self.undo_stack.clear();
        self.modified = false;
    }

    pub fn asset(&self) -> Option<&CharacterAsset> {
        self.asset.as_ref()
    }

    pub fn is_open(&self) -> bool {
        self.asset.is_some()
    }

    pub fn is_modified(&self) -> bool {
        self.modified
    }

    pub fn can_undo(&self) -> bool {
        !self.pending.is_empty() || !self.undo_stack.is_empty()
    }

    /// Paints one pixel. Returns whether the grid changed; coordinates
    /// outside the image are ignored.
    pub fn set_pixel(&mut self, x: PixelCoord, y: PixelCoord, color_idx: ColorIdx) -> Result<bool> {
        let asset = self.asset.as_mut().ok_or(EditorError::NothingOpen)?;
        match asset.set_pixel(x, y, color_idx)? {
            Some(previous) if previous != color_idx => {
                self.pending.push(PixelEdit { x, y, previous });
                self.modified = true;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    pub fn commit_stroke(&mut self) {
        if !self.pending.is_empty() {
            self.undo_stack.push(std::mem::take(&mut self.pending));
        }
    }

    /// Reverts the most recent stroke. Returns false when there is nothing
    /// to undo.
    pub fn undo(&mut self) -> bool {
        self.commit_stroke();
        let (Some(asset), Some(stroke)) = (self.asset.as_mut(), self.undo_stack.pop()) else {
            return false;
        };
        for edit in stroke.iter().rev() {
            // Previous values came out of this same grid, so they are in range.
            if let Err(e) = asset.set_pixel(edit.x, edit.y, edit.previous) {
                warn!("Could not undo pixel ({}, {}): {}", edit.x, edit.y, e);
            }
        }
        self.modified = true;
        true
    }

    /// Writes the open character back to the file it was loaded from.
    pub fn save(&mut self) -> Result<()> {
        let asset = self.asset.as_ref().ok_or(EditorError::NothingOpen)?;
        bmp::encode(asset.path(), asset)?;
        info!("Saved {}", asset.path().display());
        self.commit_stroke();
        self.modified = false;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        bmp::IndexedBitmap,
        test_util::{BmpBuilder, DARK_RED, PINK},
        workspace,
    };
    use std::fs;

    fn write_fixture(dir: &Path, stored_rows: &[Vec<u8>]) -> std::path::PathBuf {
        let path = dir.join(workspace::file_name(1));
        fs::write(&path, BmpBuilder::new(&[PINK, DARK_RED], stored_rows).build()).unwrap();
        path
    }

    // Rows in the order they sit in the file (bottom row first).
    fn stored_rows(path: &Path) -> Vec<Vec<u8>> {
        let bitmap = IndexedBitmap::parse(&fs::read(path).unwrap()).unwrap();
        let mut rows = bitmap.grid().rows();
        rows.reverse();
        rows
    }

    #[test]
    fn paint_and_save_two_by_two() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_fixture(dir.path(), &[vec![0, 1], vec![1, 0]]);
        let original = fs::read(&path).unwrap();

        let mut session = EditorSession::new();
        session.open(&path).unwrap();
        assert!(session.set_pixel(1, 0, 1).unwrap());
        session.save().unwrap();
        assert!(!session.is_modified());

        assert_eq!(stored_rows(&path), vec![vec![0, 1], vec![1, 1]]);
        let saved = fs::read(&path).unwrap();
        // headers and the two palette entries
        assert_eq!(&saved[..62], &original[..62]);
        let reloaded = bmp::decode(&path).unwrap();
        assert_eq!(reloaded.palette().len(), 2);
        assert_eq!(reloaded.palette().get(0).unwrap().rgb(), PINK);
        assert_eq!(reloaded.palette().get(1).unwrap().rgb(), DARK_RED);

        // the in-memory asset is still usable after saving
        assert!(session.set_pixel(0, 1, 1).unwrap());
        assert!(session.is_modified());
    }

    #[test]
    fn invalid_color_index_leaves_grid_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_fixture(dir.path(), &[vec![0, 1], vec![1, 0]]);
        let mut session = EditorSession::new();
        session.open(&path).unwrap();
        let before = session.asset().unwrap().grid().clone();

        let result = session.set_pixel(0, 0, 2);
        assert!(matches!(
            result,
            Err(EditorError::InvalidIndex {
                index: 2,
                palette_len: 2
            })
        ));
        assert_eq!(session.asset().unwrap().grid(), &before);
        assert!(!session.is_modified());
    }

    #[test]
    fn out_of_range_coordinates_are_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_fixture(dir.path(), &[vec![0, 1], vec![1, 0]]);
        let mut session = EditorSession::new();
        session.open(&path).unwrap();
        assert!(!session.set_pixel(2, 0, 1).unwrap());
        assert!(!session.set_pixel(0, 5, 1).unwrap());
        assert!(!session.is_modified());
    }

    #[test]
    fn nothing_open() {
        let mut session = EditorSession::new();
        assert!(matches!(
            session.set_pixel(0, 0, 0),
            Err(EditorError::NothingOpen)
        ));
        assert!(matches!(session.save(), Err(EditorError::NothingOpen)));
        assert!(!session.undo());
    }

    #[test]
    fn failed_open_keeps_current_character() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_fixture(dir.path(), &[vec![0, 1], vec![1, 0]]);
        let bad = dir.path().join(workspace::file_name(2));
        fs::write(
            &bad,
            BmpBuilder::new(&[PINK], &[vec![0, 0, 0]]).bit_count(24).build(),
        )
        .unwrap();

        let mut session = EditorSession::new();
        session.open(&path).unwrap();
        session.set_pixel(0, 0, 0).unwrap();

        assert!(matches!(
            session.open(&bad),
            Err(EditorError::CorruptFormat(_))
        ));
        assert!(matches!(
            session.open(&dir.path().join("missing.bmp")),
            Err(EditorError::NotFound { .. })
        ));
        assert_eq!(session.asset().unwrap().path(), path.as_path());
        assert!(session.is_modified());
    }

    #[test]
    fn undo_reverts_whole_stroke() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_fixture(dir.path(), &[vec![0, 0, 0], vec![0, 0, 0]]);
        let original = fs::read(&path).unwrap();
        let mut session = EditorSession::new();
        session.open(&path).unwrap();

        session.set_pixel(0, 0, 1).unwrap();
        session.commit_stroke();
        session.set_pixel(1, 0, 1).unwrap();
        session.set_pixel(2, 0, 1).unwrap();
        session.set_pixel(2, 0, 0).unwrap();
        session.commit_stroke();

        assert!(session.undo());
        assert_eq!(
            session.asset().unwrap().grid().rows(),
            vec![vec![1, 0, 0], vec![0, 0, 0]]
        );
        assert!(session.undo());
        assert!(!session.undo());
        assert!(!session.can_undo());

        session.save().unwrap();
        assert_eq!(fs::read(&path).unwrap(), original);
    }

    #[test]
    fn reopening_clears_history() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_fixture(dir.path(), &[vec![0, 1], vec![1, 0]]);
        let mut session = EditorSession::new();
        session.open(&path).unwrap();
        session.set_pixel(0, 0, 0).unwrap();
        session.open(&path).unwrap();
        assert!(!session.can_undo());
        assert!(!session.is_modified());
        session.close();
        assert!(!session.is_open());
    }
}
