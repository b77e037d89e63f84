//! Main window and its components

pub mod components;
pub mod constants;
pub mod fonts;
mod main_window;

pub use main_window::MainWindow;
