//! GUI-specific constants for layout, status colors and intervals

use egui;

/// Main window dimensions
pub const WINDOW_WIDTH: f32 = 1280.0;
pub const WINDOW_HEIGHT: f32 = 720.0;
pub const WINDOW_MIN_WIDTH: f32 = 640.0;
pub const WINDOW_MIN_HEIGHT: f32 = 360.0;

/// Layout spacing
pub const PADDING: f32 = 10.0;
pub const SECTION_SPACING: f32 = 15.0;
pub const ITEM_SPACING: f32 = 8.0;

/// Status colors
pub const STATUS_OK: egui::Color32 = egui::Color32::from_rgb(0, 200, 0);
pub const STATUS_WARN: egui::Color32 = egui::Color32::from_rgb(200, 200, 0);

/// How often the window wakes to check for termination signals
pub const SIGNAL_POLL_INTERVAL_MS: u64 = 250;

/// UI font families tried in order; egui's bundled fonts are the fallback
pub const PREFERRED_UI_FONTS: &[&str] =
    &["Segoe UI", "Noto Sans", "DejaVu Sans", "Liberation Sans"];
