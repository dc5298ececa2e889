use std::path::PathBuf;

use clap::Parser;
use iced::{Subscription, Task, Theme};
use log::error;
use state::{EditorState, DEFAULT_ZOOM, MAX_ZOOM, MIN_ZOOM};

mod message;
mod persist;
mod state;
mod update;
mod view;

#[derive(Parser, Debug)]
#[command(about = "Pixel editor for indexed-color bitmap font strips")]
struct Args {
    /// Folder containing char*.bmp files (defaults to the current directory)
    #[arg(long)]
    workspace: Option<PathBuf>,

    /// Initial canvas zoom, in screen pixels per bitmap pixel
    #[arg(long, default_value_t = DEFAULT_ZOOM,
          value_parser = clap::value_parser!(u32).range(MIN_ZOOM as i64..=MAX_ZOOM as i64))]
    zoom: u32,
}

fn theme(_state: &EditorState) -> Theme {
    match dark_light::detect().unwrap_or(dark_light::Mode::Unspecified) {
        dark_light::Mode::Light => Theme::Light,
        dark_light::Mode::Dark | dark_light::Mode::Unspecified => Theme::Dark,
    }
}

fn title(state: &EditorState) -> String {
    match state.open_entry() {
        Some(entry) => format!(
            "Monkey Island Font Editor - {}{}",
            entry
                .path
                .file_name()
                .map(|n| n.to_string_lossy())
                .unwrap_or_default(),
            if state.session.is_modified() { " *" } else { "" }
        ),
        None => "Monkey Island Font Editor".to_string(),
    }
}

fn subscription(_state: &EditorState) -> Subscription<message::Message> {
    iced::event::listen().map(message::Message::Event)
}

pub fn main() -> iced::Result {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();
    let state = match state::get_initial_state(args.workspace, args.zoom) {
        Ok(s) => s,
        Err(e) => {
            error!("Unable to open workspace: {:#}", e);
            std::process::exit(1);
        }
    };

    iced::application(title, update::update, view::view)
        .font(iced_fonts::REQUIRED_FONT_BYTES)
        .font(iced_fonts::BOOTSTRAP_FONT_BYTES)
        .theme(theme)
        .subscription(subscription)
        .window_size((1200.0, 800.0))
        .run_with(move || (state, Task::none()))
}
