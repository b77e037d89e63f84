//! The single top-level window

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use eframe::egui;
use tracing::info;

use super::components::settings_view;
use super::constants::*;
use crate::constants::app;
use crate::settings::SettingsCatalog;
use crate::shell::{ShellContext, UiLoop};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tab {
    Set(usize),
    Debug,
}

/// Paths shown on the debug tab
struct PathSummary {
    storage_root: PathBuf,
    config_path: PathBuf,
    content_root: PathBuf,
    overrides_active: bool,
}

pub struct MainWindow {
    catalog: Arc<SettingsCatalog>,
    paths: Option<PathSummary>,
    show_debug_tab: bool,
    selected: Tab,
    ui_loop: UiLoop,
    close_requested: Arc<AtomicBool>,
    centered: bool,
}

impl MainWindow {
    pub fn new(context: &ShellContext, ui_loop: UiLoop, close_requested: Arc<AtomicBool>) -> Self {
        info!("Creating main window");

        let config = context.config.instance();
        let paths = config.map(|config| PathSummary {
            storage_root: config.storage_root().to_path_buf(),
            config_path: config.config_path().to_path_buf(),
            content_root: config.content_root(),
            overrides_active: config.has_overrides(),
        });

        Self {
            catalog: Arc::clone(&context.catalog),
            paths,
            show_debug_tab: config.is_some_and(|config| config.show_debug_tab()),
            selected: Tab::Set(0),
            ui_loop,
            close_requested,
            centered: false,
        }
    }

    fn process_close_request(&mut self, ctx: &egui::Context) {
        if self.close_requested.swap(false, Ordering::SeqCst) {
            info!("Termination signal received, closing main window");
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
        }
    }

    /// Center on the monitor once its size is known
    fn center_window(&mut self, ctx: &egui::Context) {
        let (monitor_size, outer_rect, fullscreen) = ctx.input(|i| {
            let viewport = i.viewport();
            (viewport.monitor_size, viewport.outer_rect, viewport.fullscreen)
        });

        if fullscreen == Some(true) {
            self.centered = true;
            return;
        }
        if let (Some(monitor_size), Some(outer_rect)) = (monitor_size, outer_rect) {
            let position = centered_position(monitor_size, outer_rect.size());
            ctx.send_viewport_cmd(egui::ViewportCommand::OuterPosition(position));
            self.centered = true;
        }
    }

    fn tab_bar(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            for (index, set) in self.catalog.settings().iter().enumerate() {
                ui.selectable_value(&mut self.selected, Tab::Set(index), &set.title);
            }
            if self.show_debug_tab {
                ui.selectable_value(&mut self.selected, Tab::Debug, "Debug");
            }
        });
    }

    fn debug_ui(&self, ui: &mut egui::Ui) {
        ui.group(|ui| {
            ui.label(egui::RichText::new("Storage").heading().strong());
            ui.add_space(ITEM_SPACING);
            match &self.paths {
                Some(paths) => {
                    ui.label(format!("Storage root: {}", paths.storage_root.display()));
                    ui.label(format!("Config file: {}", paths.config_path.display()));
                    ui.label(format!("Content root: {}", paths.content_root.display()));
                    if paths.overrides_active {
                        ui.colored_label(STATUS_WARN, "Command-line overrides active (not saved)");
                    }
                }
                None => {
                    ui.colored_label(STATUS_WARN, "Configuration not loaded");
                }
            }
        });

        ui.add_space(SECTION_SPACING);

        ui.group(|ui| {
            ui.label(egui::RichText::new("Status").heading().strong());
            ui.add_space(ITEM_SPACING);
            if self.ui_loop.has_quit() {
                ui.colored_label(STATUS_WARN, "\u{25CF}  Quitting");
            } else {
                ui.colored_label(STATUS_OK, "\u{25CF}  Running");
            }
            ui.label(format!("Settings sets: {}", self.catalog.settings().len()));
        });
    }
}

impl eframe::App for MainWindow {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_close_request(ctx);
        if !self.centered {
            self.center_window(ctx);
        }

        egui::TopBottomPanel::top("tabs").show(ctx, |ui| {
            ui.add_space(PADDING);
            self.tab_bar(ui);
            ui.add_space(PADDING);
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| match self.selected {
                Tab::Set(index) => match self.catalog.settings().get(index) {
                    Some(set) => settings_view::ui(ui, set),
                    None => {
                        ui.heading(app::NAME);
                        ui.label("No settings available");
                    }
                },
                Tab::Debug => self.debug_ui(ui),
            });
        });

        // Wake periodically so termination signals are seen while idle
        ctx.request_repaint_after(Duration::from_millis(SIGNAL_POLL_INTERVAL_MS));
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        info!("Main window closing");
        self.ui_loop.quit();
    }
}

/// Top-left position that centers a window of `outer_size` on a monitor
fn centered_position(monitor_size: egui::Vec2, outer_size: egui::Vec2) -> egui::Pos2 {
    let offset = ((monitor_size - outer_size) / 2.0).max(egui::Vec2::ZERO);
    egui::pos2(offset.x.round(), offset.y.round())
}
