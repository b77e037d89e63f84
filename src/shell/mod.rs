//! Application shell: the UI runtime and its single top-level window
//!
//! The bootstrap controller constructs a shell, registers its quit listener,
//! calls [`ApplicationShell::run`] (blocks until the UI exits) and then
//! [`ApplicationShell::await_quit`] for the loop's full-stop confirmation.

mod egui_shell;
mod ui_loop;

pub use egui_shell::EguiShell;
pub use ui_loop::{QuitListener, UiLoop};

use std::sync::Arc;

use crate::config::ConfigStore;
use crate::error::ShellError;
use crate::settings::SettingsCatalog;

/// What a shell is built from
#[derive(Clone)]
pub struct ShellContext {
    pub config: Arc<ConfigStore>,
    pub catalog: Arc<SettingsCatalog>,
}

pub trait ApplicationShell {
    fn ui_loop(&self) -> &UiLoop;

    /// Register a listener fired once when the UI requests exit
    fn on_quit(&mut self, listener: QuitListener) -> bool {
        self.ui_loop().on_quit(listener)
    }

    /// Enter the event loop. Blocks until the UI exits and returns the exit code.
    fn run(&mut self) -> Result<i32, ShellError>;

    /// Block until the event loop has fully stopped
    fn await_quit(&self) {
        self.ui_loop().await_quit()
    }
}
