use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use iced::widget::image;
use log::{info, warn};

use monkey_font_editor::{
    bmp::{self, IndexedBitmap},
    glyph, workspace,
};

use crate::state::{EditorState, Thumbnail};

fn preview_handle(bitmap: &IndexedBitmap) -> image::Handle {
    image::Handle::from_rgba(
        bitmap.width() as u32,
        bitmap.height() as u32,
        bitmap.to_rgba(),
    )
}

fn load_preview(path: &Path) -> Option<image::Handle> {
    match bmp::decode(path) {
        Ok(asset) => Some(preview_handle(asset.bitmap())),
        Err(e) => {
            warn!("No preview for {}: {}", path.display(), e);
            None
        }
    }
}

fn load_thumbnails(dir: &Path) -> Result<Vec<Thumbnail>> {
    let entries = workspace::discover(dir)
        .with_context(|| format!("Unable to list character files in {}", dir.display()))?;
    Ok(entries
        .into_iter()
        .map(|entry| Thumbnail {
            preview: load_preview(&entry.path),
            entry,
        })
        .collect())
}

fn warn_if_empty(state: &mut EditorState, dir: &Path) {
    if state.characters.is_empty() {
        warn!("No character files in {}", dir.display());
        state.show_message(
            "No Files Found",
            "No character bitmap files (char*.bmp) found in workspace.",
        );
    }
}

pub fn load_workspace(state: &mut EditorState, dir: PathBuf) -> Result<()> {
    info!("Opening workspace {}", dir.display());
    let characters = load_thumbnails(&dir)?;
    if state.session.is_modified() {
        warn!("Discarding unsaved edits to switch workspace.");
    }
    state.session.close();
    state.open_idx = None;
    state.hover_row = None;
    state.characters = characters;
    warn_if_empty(state, &dir);
    state.workspace_dir = Some(dir);
    Ok(())
}

/// Rescans the current workspace. The open character, including any unsaved
/// edits, stays loaded as long as its file is still listed.
pub fn reload_workspace(state: &mut EditorState) -> Result<()> {
    let Some(dir) = state.workspace_dir.clone() else {
        return Ok(());
    };
    info!("Reloading workspace {}", dir.display());
    state.characters = load_thumbnails(&dir)?;
    state.open_idx = state.session.asset().and_then(|asset| {
        state
            .characters
            .iter()
            .position(|t| t.entry.path == asset.path())
    });
    if state.open_idx.is_none() && state.session.is_open() {
        if state.session.is_modified() {
            warn!("Open character is no longer in the workspace; discarding unsaved edits.");
        }
        state.session.close();
        state.hover_row = None;
    }
    warn_if_empty(state, &dir);
    Ok(())
}

pub fn open_character(state: &mut EditorState, idx: usize) -> Result<()> {
    let thumbnail = state
        .characters
        .get(idx)
        .context("character not in workspace")?;
    let path = thumbnail.entry.path.clone();
    let index = thumbnail.entry.index;
    let asset = state
        .session
        .open(&path)
        .with_context(|| format!("Failed to load character #{}", index))?;
    let height = asset.bitmap().height();
    state.glyph_height = glyph::detect_glyph_height(height);
    state.open_idx = Some(idx);
    state.hover_row = None;
    info!(
        "Editing {} (glyph height {}, {} glyphs)",
        path.display(),
        state.glyph_height,
        glyph::glyph_count(height, state.glyph_height)
    );
    Ok(())
}

pub fn save_character(state: &mut EditorState) -> Result<()> {
    let idx = state.open_idx.context("No character is currently loaded.")?;
    let index = state.characters[idx].entry.index;
    state
        .session
        .save()
        .with_context(|| format!("Failed to save character #{}", index))?;
    if let Some(asset) = state.session.asset() {
        state.characters[idx].preview = Some(preview_handle(asset.bitmap()));
    }
    Ok(())
}
