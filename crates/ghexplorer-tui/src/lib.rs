// Terminal UI implementation using ratatui

pub mod app;
pub mod palette;
pub mod runner;
pub mod ui;

pub use app::{App, InputMode, Retry, StatusKind, View};
pub use palette::Palette;
pub use runner::run_tui;
