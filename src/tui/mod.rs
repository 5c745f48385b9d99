// src/tui/mod.rs - Interactive terminal UI.
//
// Renders the Login, Dashboard, MyPage and Analysis Detail pages with
// ratatui. Launch via `dropsee ui` (or `dropsee` with no subcommand).

pub mod app;
pub mod theme;
pub mod widgets;

pub use app::run_ui;
