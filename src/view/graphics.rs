// Module for displaying and editing the open font strip pixel-by-pixel
use iced::{
    mouse,
    widget::{
        canvas, center,
        scrollable::{Direction, Scrollbar},
        text, Scrollable,
    },
    Element, Length, Pixels, Point, Size,
};

use monkey_font_editor::{
    bmp::IndexedBitmap,
    common::{ColorIdx, PixelCoord},
    glyph,
};

use crate::{message::Message, state::EditorState};

struct PixelCanvas<'a> {
    bitmap: &'a IndexedBitmap,
    pixel_size: f32,
    grid_enabled: bool,
    show_glyph_labels: bool,
    glyph_height: usize,
    hover_row: Option<PixelCoord>,
}

#[derive(Default)]
struct InternalState {
    painting: bool,
    last_pixel: Option<(PixelCoord, PixelCoord)>,
}

impl<'a> PixelCanvas<'a> {
    fn pixel_at(&self, p: Point) -> Option<(PixelCoord, PixelCoord)> {
        if p.x < 0.0 || p.y < 0.0 {
            return None;
        }
        let x = (p.x / self.pixel_size) as PixelCoord;
        let y = (p.y / self.pixel_size) as PixelCoord;
        if self.bitmap.grid().in_bounds(x, y) {
            Some((x, y))
        } else {
            None
        }
    }

    fn color(&self, idx: ColorIdx) -> iced::Color {
        let (r, g, b) = self.bitmap.palette().get(idx).unwrap_or_default().rgb();
        iced::Color::from_rgb8(r, g, b)
    }
}

impl<'a> canvas::Program<Message> for PixelCanvas<'a> {
    type State = InternalState;

    fn update(
        &self,
        state: &mut Self::State,
        event: canvas::Event,
        bounds: iced::Rectangle,
        cursor: mouse::Cursor,
    ) -> (canvas::event::Status, Option<Message>) {
        let pixel = cursor.position_in(bounds).and_then(|p| self.pixel_at(p));

        let canvas::Event::Mouse(mouse_event) = event else {
            return (canvas::event::Status::Ignored, None);
        };
        match mouse_event {
            mouse::Event::ButtonPressed(mouse::Button::Left) => {
                let Some((x, y)) = pixel else {
                    return (canvas::event::Status::Ignored, None);
                };
                state.painting = true;
                state.last_pixel = Some((x, y));
                (
                    canvas::event::Status::Captured,
                    Some(Message::PaintPixel(x, y)),
                )
            }
            mouse::Event::ButtonReleased(mouse::Button::Left) if state.painting => {
                state.painting = false;
                state.last_pixel = None;
                (canvas::event::Status::Captured, Some(Message::EndStroke))
            }
            mouse::Event::CursorMoved { .. } => {
                if state.painting {
                    if let Some((x, y)) = pixel {
                        if state.last_pixel != Some((x, y)) {
                            state.last_pixel = Some((x, y));
                            return (
                                canvas::event::Status::Captured,
                                Some(Message::PaintPixel(x, y)),
                            );
                        }
                    }
                }
                let row = pixel.map(|(_, y)| y);
                if row != self.hover_row {
                    return (canvas::event::Status::Captured, Some(Message::HoverRow(row)));
                }
                (canvas::event::Status::Ignored, None)
            }
            mouse::Event::CursorLeft => {
                if state.painting {
                    state.painting = false;
                    state.last_pixel = None;
                    return (canvas::event::Status::Captured, Some(Message::EndStroke));
                }
                (
                    canvas::event::Status::Ignored,
                    self.hover_row.map(|_| Message::HoverRow(None)),
                )
            }
            _ => (canvas::event::Status::Ignored, None),
        }
    }

    fn draw(
        &self,
        _state: &InternalState,
        renderer: &iced::Renderer,
        _theme: &iced::Theme,
        bounds: iced::Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<canvas::Geometry> {
        let mut frame = canvas::Frame::new(renderer, bounds.size());
        let grid = self.bitmap.grid();
        let pixel_size = self.pixel_size;
        let full_width = grid.width() as f32 * pixel_size;
        let full_height = grid.height() as f32 * pixel_size;

        for y in 0..grid.height() {
            for (x, &idx) in grid.row(y).iter().enumerate() {
                frame.fill_rectangle(
                    Point {
                        x: x as f32 * pixel_size,
                        y: y as f32 * pixel_size,
                    },
                    Size {
                        width: pixel_size,
                        height: pixel_size,
                    },
                    self.color(idx),
                );
            }
        }

        if self.grid_enabled {
            let stroke = canvas::Stroke::default()
                .with_width(1.0)
                .with_color(iced::Color::from_rgba8(100, 100, 100, 100.0 / 255.0));
            for x in 0..=grid.width() {
                let px = x as f32 * pixel_size;
                frame.stroke(
                    &canvas::Path::line(Point::new(px, 0.0), Point::new(px, full_height)),
                    stroke,
                );
            }
            for y in 0..=grid.height() {
                let py = y as f32 * pixel_size;
                frame.stroke(
                    &canvas::Path::line(Point::new(0.0, py), Point::new(full_width, py)),
                    stroke,
                );
            }
        }

        if self.show_glyph_labels {
            let glyph_height = self.glyph_height;
            let hovered = self
                .hover_row
                .map(|row| glyph::glyph_at_row(row, glyph_height));
            let glyph_span = glyph_height as f32 * pixel_size;
            for glyph_idx in 0..glyph::glyph_count(grid.height(), glyph_height) {
                let y_start = glyph_idx as f32 * glyph_span;
                let is_hovered = hovered == Some(glyph_idx);

                if glyph_idx > 0 {
                    let color = if is_hovered {
                        iced::Color::from_rgba8(255, 0, 0, 150.0 / 255.0)
                    } else {
                        iced::Color::from_rgba8(0, 255, 0, 80.0 / 255.0)
                    };
                    frame.stroke(
                        &canvas::Path::line(
                            Point::new(0.0, y_start),
                            Point::new(full_width, y_start),
                        ),
                        canvas::Stroke::default().with_width(2.0).with_color(color),
                    );
                }

                let (background, foreground) = if is_hovered {
                    (
                        iced::Color::from_rgba8(255, 255, 0, 200.0 / 255.0),
                        iced::Color::BLACK,
                    )
                } else {
                    (
                        iced::Color::from_rgba8(0, 0, 0, 180.0 / 255.0),
                        iced::Color::WHITE,
                    )
                };
                frame.fill_rectangle(
                    Point::new(5.0, y_start + 2.0),
                    Size::new(200.0, 16.0),
                    background,
                );
                frame.fill_text(canvas::Text {
                    content: glyph::glyph_label(glyph_idx),
                    position: Point::new(8.0, y_start + 3.0),
                    color: foreground,
                    size: Pixels(12.0),
                    ..Default::default()
                });
            }
        }

        vec![frame.into_geometry()]
    }

    fn mouse_interaction(
        &self,
        _interaction: &Self::State,
        bounds: iced::Rectangle,
        cursor: mouse::Cursor,
    ) -> mouse::Interaction {
        if cursor.is_over(bounds) {
            mouse::Interaction::Crosshair
        } else {
            mouse::Interaction::default()
        }
    }
}

pub fn graphics_view(state: &EditorState) -> Element<Message> {
    let Some(asset) = state.session.asset() else {
        return center(text("No character loaded")).into();
    };
    let bitmap = asset.bitmap();
    let pixel_size = state.zoom as f32;
    let content = iced::widget::canvas(PixelCanvas {
        bitmap,
        pixel_size,
        grid_enabled: state.grid_enabled,
        show_glyph_labels: state.show_glyph_labels,
        glyph_height: state.glyph_height,
        hover_row: state.hover_row,
    })
    .width(bitmap.width() as f32 * pixel_size + 1.0)
    .height(bitmap.height() as f32 * pixel_size + 1.0);

    Scrollable::with_direction(
        content,
        Direction::Both {
            vertical: Scrollbar::default(),
            horizontal: Scrollbar::default(),
        },
    )
    .width(Length::Fill)
    .height(Length::Fill)
    .into()
}
