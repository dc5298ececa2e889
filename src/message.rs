use std::path::PathBuf;

use monkey_font_editor::common::{ColorIdx, PixelCoord};

#[derive(Debug, Clone)]
pub enum Message {
    Event(iced::Event),
    OpenWorkspace,
    WorkspaceOpened(Option<PathBuf>),
    ReloadWorkspace,
    SelectCharacter(usize),
    SelectColor(ColorIdx),
    PaintPixel(PixelCoord, PixelCoord),
    EndStroke,
    HoverRow(Option<PixelCoord>),
    ZoomIn,
    ZoomOut,
    SetGrid(bool),
    SetGlyphLabels(bool),
    Undo,
    SaveCharacter,
    HelpDialogue,
    HideModal,
}
