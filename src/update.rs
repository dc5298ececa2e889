use iced::{
    keyboard::{self, key},
    Event, Task,
};
use log::{error, info, warn};

use crate::{
    message::Message,
    persist,
    state::{EditorState, MAX_ZOOM, MIN_ZOOM, ZOOM_STEP},
    view::open_workspace,
};

fn report_error(state: &mut EditorState, title: &str, e: anyhow::Error) {
    error!("{}: {:#}", title, e);
    state.show_message(title, format!("{:#}", e));
}

fn adjust_zoom(state: &mut EditorState, zoom_in: bool) {
    state.zoom = if zoom_in {
        (state.zoom + ZOOM_STEP).min(MAX_ZOOM)
    } else {
        state.zoom.saturating_sub(ZOOM_STEP).max(MIN_ZOOM)
    };
}

fn save(state: &mut EditorState) {
    let Some(entry) = state.open_entry() else {
        warn!("Save requested with no character loaded.");
        state.show_message("No File", "No character is currently loaded.");
        return;
    };
    let index = entry.index;
    match persist::save_character(state) {
        Ok(()) => state.show_message("Saved", format!("Character #{} saved successfully!", index)),
        Err(e) => report_error(state, "Save Error", e),
    }
}

fn undo(state: &mut EditorState) {
    if !state.session.undo() {
        info!("Nothing to undo.");
    }
}

pub fn update(state: &mut EditorState, message: Message) -> Task<Message> {
    match message {
        Message::Event(event) => match event {
            Event::Keyboard(keyboard::Event::KeyPressed {
                key: keyboard::Key::Named(key::Named::Escape),
                ..
            }) => {
                state.dialogue = None;
            }
            Event::Keyboard(keyboard::Event::KeyPressed {
                modified_key,
                modifiers,
                ..
            }) => {
                if state.dialogue.is_some() {
                    return Task::none();
                }
                let keyboard::Key::Character(c) = modified_key else {
                    return Task::none();
                };
                match (modifiers.command(), c.as_str()) {
                    (true, "s") => save(state),
                    (true, "z") => undo(state),
                    (false, "0") => state.color_idx = 0,
                    (false, "1") => state.color_idx = 1,
                    (false, "+") | (false, "=") => adjust_zoom(state, true),
                    (false, "-") => adjust_zoom(state, false),
                    (false, "g") => state.grid_enabled = !state.grid_enabled,
                    _ => {}
                }
            }
            _ => {}
        },
        Message::OpenWorkspace => {
            return Task::perform(open_workspace(), Message::WorkspaceOpened);
        }
        Message::WorkspaceOpened(path) => match path {
            Some(p) => {
                if let Err(e) = persist::load_workspace(state, p) {
                    report_error(state, "Load Error", e);
                }
            }
            None => {
                info!("Workspace folder not selected.");
            }
        },
        Message::ReloadWorkspace => {
            if let Err(e) = persist::reload_workspace(state) {
                report_error(state, "Load Error", e);
            }
        }
        Message::SelectCharacter(idx) => {
            if let Err(e) = persist::open_character(state, idx) {
                report_error(state, "Load Error", e);
            }
        }
        Message::SelectColor(idx) => {
            state.color_idx = idx;
        }
        Message::PaintPixel(x, y) => {
            if let Err(e) = state.session.set_pixel(x, y, state.color_idx) {
                warn!("Cannot paint ({}, {}): {}", x, y, e);
            }
        }
        Message::EndStroke => {
            state.session.commit_stroke();
        }
        Message::HoverRow(row) => {
            state.hover_row = row;
        }
        Message::ZoomIn => adjust_zoom(state, true),
        Message::ZoomOut => adjust_zoom(state, false),
        Message::SetGrid(enabled) => {
            state.grid_enabled = enabled;
        }
        Message::SetGlyphLabels(enabled) => {
            state.show_glyph_labels = enabled;
        }
        Message::Undo => undo(state),
        Message::SaveCharacter => save(state),
        Message::HelpDialogue => {
            state.dialogue = Some(crate::state::Dialogue::Help);
        }
        Message::HideModal => {
            state.dialogue = None;
        }
    }
    Task::none()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{get_initial_state, Dialogue, DEFAULT_ZOOM};
    use monkey_font_editor::{
        bmp::IndexedBitmap,
        common::{Palette, PaletteEntry, PixelGrid},
        workspace,
    };
    use std::fs;

    // 2x2 pink/dark-red character; stored rows are [0, 1] then [1, 0].
    fn fixture() -> Vec<u8> {
        let palette = Palette::new(vec![
            PaletteEntry::from_bytes([203, 192, 255, 0]),
            PaletteEntry::from_bytes([0, 0, 139, 0]),
        ]);
        let grid = PixelGrid::from_rows(&[vec![1, 0], vec![0, 1]]).unwrap();
        IndexedBitmap::new(palette, grid).unwrap().to_bytes()
    }

    #[test]
    fn zoom_stays_in_range() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = get_initial_state(Some(dir.path().to_owned()), DEFAULT_ZOOM).unwrap();
        assert!(matches!(state.dialogue, Some(Dialogue::Message { .. })));
        for _ in 0..20 {
            let _ = update(&mut state, Message::ZoomIn);
        }
        assert_eq!(state.zoom, MAX_ZOOM);
        for _ in 0..20 {
            let _ = update(&mut state, Message::ZoomOut);
        }
        assert_eq!(state.zoom, MIN_ZOOM);
    }

    #[test]
    fn paint_and_save_through_messages() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(workspace::file_name(1));
        fs::write(&path, fixture()).unwrap();

        let mut state = get_initial_state(Some(dir.path().to_owned()), DEFAULT_ZOOM).unwrap();
        assert_eq!(state.characters.len(), 1);
        assert!(state.characters[0].preview.is_some());

        let _ = update(&mut state, Message::SelectCharacter(0));
        assert_eq!(state.open_idx, Some(0));
        let _ = update(&mut state, Message::SelectColor(1));
        let _ = update(&mut state, Message::PaintPixel(1, 0));
        let _ = update(&mut state, Message::EndStroke);
        assert!(state.session.is_modified());
        let _ = update(&mut state, Message::SaveCharacter);
        assert!(!state.session.is_modified());

        let bytes = fs::read(&path).unwrap();
        assert_eq!(&bytes[62..], &[0, 1, 0, 0, 1, 1, 0, 0]);
        match &state.dialogue {
            Some(Dialogue::Message { title, .. }) => assert_eq!(title, "Saved"),
            _ => panic!("expected a saved dialogue"),
        }
    }

    #[test]
    fn broken_file_reports_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut data = fixture();
        data[28] = 24;
        fs::write(dir.path().join(workspace::file_name(1)), data).unwrap();

        let mut state = get_initial_state(Some(dir.path().to_owned()), DEFAULT_ZOOM).unwrap();
        assert!(state.characters[0].preview.is_none());
        let _ = update(&mut state, Message::SelectCharacter(0));
        assert_eq!(state.open_idx, None);
        match &state.dialogue {
            Some(Dialogue::Message { title, .. }) => assert_eq!(title, "Load Error"),
            _ => panic!("expected a load error dialogue"),
        }
    }

    #[test]
    fn reload_keeps_unsaved_edits() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(workspace::file_name(2)), fixture()).unwrap();
        let mut state = get_initial_state(Some(dir.path().to_owned()), DEFAULT_ZOOM).unwrap();
        let _ = update(&mut state, Message::SelectCharacter(0));
        let _ = update(&mut state, Message::SelectColor(1));
        let _ = update(&mut state, Message::PaintPixel(0, 1));
        let _ = update(&mut state, Message::EndStroke);

        // A new file sorts ahead of the open one.
        fs::write(dir.path().join(workspace::file_name(1)), fixture()).unwrap();
        let _ = update(&mut state, Message::ReloadWorkspace);

        assert_eq!(state.characters.len(), 2);
        assert_eq!(state.open_idx, Some(1));
        assert!(state.session.is_modified());
        assert_eq!(state.session.asset().unwrap().grid().get(0, 1), Some(1));
    }

    #[test]
    fn reload_closes_character_whose_file_is_gone() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(workspace::file_name(1));
        fs::write(&path, fixture()).unwrap();
        let mut state = get_initial_state(Some(dir.path().to_owned()), DEFAULT_ZOOM).unwrap();
        let _ = update(&mut state, Message::SelectCharacter(0));
        assert!(state.session.is_open());

        fs::remove_file(&path).unwrap();
        let _ = update(&mut state, Message::ReloadWorkspace);

        assert!(state.characters.is_empty());
        assert_eq!(state.open_idx, None);
        assert!(!state.session.is_open());
    }
}
