mod graphics;
mod palette;
mod thumbnails;

use std::path::PathBuf;

use graphics::graphics_view;
use iced::{
    alignment::Vertical,
    widget::{
        button, center, checkbox, column, container, horizontal_space, mouse_area, opaque, row,
        stack, text, Column,
    },
    Element, Font, Length, Theme,
};
use iced_aw::quad;
use palette::color_buttons_view;
use thumbnails::thumbnails_view;

use monkey_font_editor::glyph;

use crate::{
    message::Message,
    state::{Dialogue, EditorState},
};

pub async fn open_workspace() -> Option<PathBuf> {
    let picked_dir = rfd::AsyncFileDialog::new()
        .set_title("Select a folder with character bitmaps ...")
        .pick_folder()
        .await;
    picked_dir.map(|x| x.path().to_owned())
}

fn modal<'a, Message>(
    base: impl Into<Element<'a, Message>>,
    content: impl Into<Element<'a, Message>>,
    on_blur: Message,
) -> Element<'a, Message>
where
    Message: Clone + 'a,
{
    stack![
        base.into(),
        opaque(
            mouse_area(center(opaque(content)).style(|_theme| {
                container::Style {
                    background: Some(
                        iced::Color {
                            a: 0.5,
                            ..iced::Color::BLACK
                        }
                        .into(),
                    ),
                    ..container::Style::default()
                }
            }))
            .on_press(on_blur)
        )
    ]
    .into()
}

pub fn modal_background_style(theme: &Theme) -> container::Style {
    let palette = theme.extended_palette();
    container::Style {
        background: Some(palette.background.base.color.into()),
        border: iced::border::rounded(4)
            .color(palette.background.weak.color)
            .width(1.0),
        ..container::Style::default()
    }
}

fn vertical_separator() -> quad::Quad {
    quad::Quad {
        quad_color: iced::Color::from([0.5; 3]).into(),
        quad_border: iced::Border {
            radius: iced::border::Radius::new(1.0),
            ..Default::default()
        },
        inner_bounds: iced_aw::widget::InnerBounds::Ratio(1.0, 1.0),
        width: Length::Fixed(1.0),
        ..Default::default()
    }
}

pub fn help_view(_state: &EditorState) -> Element<Message> {
    let controls = vec![
        ("0 / 1", "Color", "paint with palette index 0 or 1"),
        ("+ / -", "Zoom", "change the canvas zoom"),
        ("g", "Grid", "show or hide the pixel grid"),
        ("Ctrl+Z", "Undo", "revert the last stroke"),
        ("Ctrl+S", "Save", "overwrite the character file"),
    ];
    let mut col = Column::new();
    col = col.push(text("Keyboard controls:"));
    for (key, name, desc) in controls {
        col = col.push(
            row![
                text(key).width(70).font(Font {
                    weight: iced::font::Weight::ExtraBold,
                    ..Default::default()
                }),
                text(format!("{}: {}", name, desc)).width(350),
            ]
            .align_y(Vertical::Center),
        );
    }

    container(col.spacing(10))
        .width(450)
        .padding(25)
        .style(modal_background_style)
        .into()
}

fn message_view<'a>(title: &'a str, body: &'a str) -> Element<'a, Message> {
    container(
        column![
            text(title).font(Font {
                weight: iced::font::Weight::Bold,
                ..Default::default()
            }),
            text(body),
            row![
                horizontal_space(),
                button(text("OK")).on_press(Message::HideModal)
            ],
        ]
        .spacing(10),
    )
    .width(400)
    .padding(25)
    .style(modal_background_style)
    .into()
}

pub fn view_dialogue<'a>(
    state: &'a EditorState,
    main_view: Element<'a, Message>,
) -> Element<'a, Message> {
    if let Some(dialogue) = &state.dialogue {
        match dialogue {
            Dialogue::Message { title, text } => {
                modal(main_view, message_view(title, text), Message::HideModal)
            }
            Dialogue::Help => modal(main_view, help_view(state), Message::HideModal),
        }
    } else {
        main_view
    }
}

fn info_line(state: &EditorState) -> String {
    let (Some(entry), Some(asset)) = (state.open_entry(), state.session.asset()) else {
        return "Select a character to edit".to_string();
    };
    let height = asset.bitmap().height();
    let count = glyph::glyph_count(height, state.glyph_height);
    format!(
        "Editing: {} | Char Height: {}px | Contains {} characters (ASCII 0-{}) | Hover over canvas to see character indices",
        entry
            .path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default(),
        state.glyph_height,
        count,
        count.saturating_sub(1)
    )
}

fn controls_view(state: &EditorState) -> Element<Message> {
    let mut undo_button = button(text("Undo")).style(button::secondary);
    if state.session.can_undo() {
        undo_button = undo_button.on_press(Message::Undo);
    }
    let mut save_button = button(text("Save").font(Font {
        weight: iced::font::Weight::Bold,
        ..Default::default()
    }))
    .padding([5, 20]);
    if state.session.is_open() {
        save_button = save_button.on_press(Message::SaveCharacter);
    }
    row![
        button(text("Zoom -"))
            .style(button::secondary)
            .on_press(Message::ZoomOut),
        button(text("Zoom +"))
            .style(button::secondary)
            .on_press(Message::ZoomIn),
        text(format!("{}x", state.zoom)),
        horizontal_space(),
        color_buttons_view(state),
        horizontal_space(),
        checkbox("Grid", state.grid_enabled).on_toggle(Message::SetGrid),
        checkbox("Labels", state.show_glyph_labels).on_toggle(Message::SetGlyphLabels),
        undo_button,
        save_button,
    ]
    .spacing(10)
    .align_y(Vertical::Center)
    .into()
}

pub fn view(state: &EditorState) -> Element<Message> {
    let side_panel: Element<Message> = column![
        row![
            text("Characters").size(14).font(Font {
                weight: iced::font::Weight::Bold,
                ..Default::default()
            }),
            horizontal_space(),
            button(text("\u{F3D7}").font(iced_fonts::BOOTSTRAP_FONT))
                .style(button::secondary)
                .on_press(Message::OpenWorkspace),
            button(text("\u{F116}").font(iced_fonts::BOOTSTRAP_FONT))
                .style(button::secondary)
                .on_press(Message::ReloadWorkspace),
        ]
        .spacing(10)
        .align_y(Vertical::Center),
        thumbnails_view(state),
    ]
    .padding(10)
    .spacing(10)
    .width(400)
    .into();

    let main_panel: Element<Message> = column![
        row![
            text(info_line(state)).size(14),
            horizontal_space(),
            button(text("\u{F505}").font(iced_fonts::BOOTSTRAP_FONT))
                .style(button::secondary)
                .on_press(Message::HelpDialogue),
        ]
        .spacing(10)
        .align_y(Vertical::Center),
        graphics_view(state),
        controls_view(state),
    ]
    .padding(10)
    .spacing(10)
    .into();

    let mut main_view: Element<Message> = row![side_panel, vertical_separator(), main_panel]
        .spacing(0)
        .width(Length::Fill)
        .height(Length::Fill)
        .into();

    main_view = view_dialogue(state, main_view);
    main_view
}
