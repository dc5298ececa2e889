// Module for the scrollable grid of character files in the workspace.
use iced::{
    alignment::Horizontal,
    widget::{button, column, image, scrollable, text, Column, Row},
    Element, Font, Length,
};
use itertools::Itertools;

use crate::{
    message::Message,
    state::{EditorState, Thumbnail},
};

const COLUMNS: usize = 3;
const PREVIEW_SIZE: f32 = 50.0;

fn thumbnail_view(thumbnail: &Thumbnail, position: usize, selected: bool) -> Element<Message> {
    let preview: Element<Message> = match &thumbnail.preview {
        Some(handle) => image(handle.clone())
            .filter_method(image::FilterMethod::Nearest)
            .width(PREVIEW_SIZE)
            .height(PREVIEW_SIZE)
            .into(),
        None => text("Error").into(),
    };
    button(
        column![
            text(format!("#{}", thumbnail.entry.index))
                .size(12)
                .font(Font {
                    weight: iced::font::Weight::Bold,
                    ..Default::default()
                }),
            preview,
        ]
        .spacing(5)
        .align_x(Horizontal::Center),
    )
    .padding(5)
    .width(Length::Fill)
    .style(if selected {
        button::primary
    } else {
        button::secondary
    })
    .on_press(Message::SelectCharacter(position))
    .into()
}

pub fn thumbnails_view(state: &EditorState) -> Element<Message> {
    let mut col: Column<Message> = Column::new().spacing(10);
    for chunk in &state.characters.iter().enumerate().chunks(COLUMNS) {
        let mut row: Row<Message> = Row::new().spacing(10);
        for (position, thumbnail) in chunk {
            row = row.push(thumbnail_view(
                thumbnail,
                position,
                state.open_idx == Some(position),
            ));
        }
        col = col.push(row);
    }
    scrollable(col.padding(5)).height(Length::Fill).into()
}
