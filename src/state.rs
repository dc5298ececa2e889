use std::path::PathBuf;

use anyhow::Result;
use iced::widget::image;

use monkey_font_editor::{
    common::{ColorIdx, PixelCoord},
    session::EditorSession,
    workspace::CharacterEntry,
};

use crate::persist;

pub const MIN_ZOOM: u32 = 5;
pub const MAX_ZOOM: u32 = 50;
pub const ZOOM_STEP: u32 = 5;
pub const DEFAULT_ZOOM: u32 = 20;

pub struct Thumbnail {
    pub entry: CharacterEntry,
    // None when the file could not be decoded.
    pub preview: Option<image::Handle>,
}

pub enum Dialogue {
    Message { title: String, text: String },
    Help,
}

pub struct EditorState {
    pub workspace_dir: Option<PathBuf>,
    pub characters: Vec<Thumbnail>,
    pub session: EditorSession,
    // Position in `characters` of the open file.
    pub open_idx: Option<usize>,
    pub glyph_height: usize,

    pub zoom: u32,
    pub grid_enabled: bool,
    pub show_glyph_labels: bool,
    pub color_idx: ColorIdx,
    pub hover_row: Option<PixelCoord>,
    pub dialogue: Option<Dialogue>,
}

impl EditorState {
    pub fn open_entry(&self) -> Option<&CharacterEntry> {
        self.open_idx
            .and_then(|i| self.characters.get(i))
            .map(|t| &t.entry)
    }

    pub fn show_message(&mut self, title: &str, text: impl Into<String>) {
        self.dialogue = Some(Dialogue::Message {
            title: title.to_string(),
            text: text.into(),
        });
    }
}

pub fn get_initial_state(workspace_dir: Option<PathBuf>, zoom: u32) -> Result<EditorState> {
    let mut editor_state = EditorState {
        workspace_dir: None,
        characters: vec![],
        session: EditorSession::new(),
        open_idx: None,
        glyph_height: 8,
        zoom: zoom.clamp(MIN_ZOOM, MAX_ZOOM),
        grid_enabled: true,
        show_glyph_labels: true,
        color_idx: 1,
        hover_row: None,
        dialogue: None,
    };
    let dir = match workspace_dir {
        Some(d) => d,
        None => std::env::current_dir()?,
    };
    persist::load_workspace(&mut editor_state, dir)?;
    Ok(editor_state)
}
