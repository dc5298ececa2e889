// Module for choosing which of the first two palette indices to paint with
use iced::{
    widget::{button, row, text},
    Border, Element,
};

use monkey_font_editor::common::ColorIdx;

use crate::{message::Message, state::EditorState};

const PAINT_COLORS: [ColorIdx; 2] = [0, 1];

fn color_button<'a>(state: &EditorState, idx: ColorIdx) -> Element<'a, Message> {
    let fill = state
        .session
        .asset()
        .and_then(|asset| asset.palette().get(idx))
        .map(|entry| {
            let (r, g, b) = entry.rgb();
            iced::Color::from_rgb8(r, g, b)
        });
    let selected = state.color_idx == idx;
    // Dark label on light palette colors and vice versa.
    let label_color = fill.map(|c| {
        if c.r * 0.299 + c.g * 0.587 + c.b * 0.114 > 0.5 {
            iced::Color::BLACK
        } else {
            iced::Color::WHITE
        }
    });

    button(text(idx.to_string()).color_maybe(label_color))
        .width(40)
        .height(30)
        .style(move |theme, status| {
            let base = if selected {
                button::primary(theme, status)
            } else {
                button::secondary(theme, status)
            };
            let Some(color) = fill else {
                return base;
            };
            let border_color = if theme.extended_palette().is_dark {
                iced::Color::WHITE
            } else {
                iced::Color::BLACK
            };
            button::Style {
                background: Some(color.into()),
                border: Border {
                    color: border_color,
                    width: if selected { 3.0 } else { 0.0 },
                    radius: 2.0.into(),
                },
                ..base
            }
        })
        .on_press(Message::SelectColor(idx))
        .into()
}

pub fn color_buttons_view(state: &EditorState) -> Element<Message> {
    let mut colors_row = row![text("Color Index:")].spacing(5);
    for idx in PAINT_COLORS {
        colors_row = colors_row.push(color_button(state, idx));
    }
    colors_row.align_y(iced::alignment::Vertical::Center).into()
}
