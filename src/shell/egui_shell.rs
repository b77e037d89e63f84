//! eframe-backed application shell

use std::io::Cursor;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::{Context, Result, anyhow};
use eframe::{NativeOptions, egui};
use tracing::{info, warn};

use super::{ApplicationShell, ShellContext, UiLoop};
use crate::constants::app;
use crate::error::ShellError;
use crate::gui::constants::{WINDOW_HEIGHT, WINDOW_MIN_HEIGHT, WINDOW_MIN_WIDTH, WINDOW_WIDTH};
use crate::gui::{MainWindow, fonts};

pub struct EguiShell {
    ui_loop: UiLoop,
    context: ShellContext,
    native_options: Option<NativeOptions>,
}

impl EguiShell {
    /// Prepare the window: geometry, icon and fullscreen flag
    pub fn new(context: &ShellContext) -> Result<Self, ShellError> {
        let config = context
            .config
            .instance()
            .ok_or_else(|| ShellError::Construction("configuration not loaded".to_string()))?;

        let mut viewport = egui::ViewportBuilder::default()
            .with_title(app::WINDOW_TITLE)
            .with_inner_size([WINDOW_WIDTH, WINDOW_HEIGHT])
            .with_min_inner_size([WINDOW_MIN_WIDTH, WINDOW_MIN_HEIGHT])
            .with_fullscreen(config.fullscreen());

        match load_window_icon() {
            Ok(icon) => viewport = viewport.with_icon(icon),
            Err(err) => warn!(error = ?err, "Failed to load window icon, using platform default"),
        }

        Ok(Self {
            ui_loop: UiLoop::new(),
            context: context.clone(),
            native_options: Some(NativeOptions {
                viewport,
                ..Default::default()
            }),
        })
    }
}

impl ApplicationShell for EguiShell {
    fn ui_loop(&self) -> &UiLoop {
        &self.ui_loop
    }

    fn run(&mut self) -> Result<i32, ShellError> {
        let options = self.native_options.take().ok_or(ShellError::AlreadyRan)?;
        let close_requested = install_signal_handlers();

        let ui_loop = self.ui_loop.clone();
        let context = self.context.clone();
        let app_created = Arc::new(AtomicBool::new(false));
        let created = Arc::clone(&app_created);

        info!("Entering UI event loop");
        let result = eframe::run_native(
            app::WINDOW_TITLE,
            options,
            Box::new(move |cc| {
                // eframe passes the native scale factor through unrounded
                fonts::install_ui_fonts(&cc.egui_ctx);
                created.store(true, Ordering::SeqCst);
                Ok(Box::new(MainWindow::new(&context, ui_loop, close_requested)))
            }),
        );

        finish_loop(
            &self.ui_loop,
            app_created.load(Ordering::SeqCst),
            result.is_ok(),
        );

        result.map_err(|err| ShellError::Construction(err.to_string()))?;
        info!("UI event loop returned");
        Ok(0)
    }
}

/// Confirm the loop has stopped. Quit fires here only for a loop that ran
/// and ended cleanly without `on_exit`; a failed start never notifies.
fn finish_loop(ui_loop: &UiLoop, app_created: bool, loop_ok: bool) {
    if app_created && loop_ok {
        ui_loop.quit();
    }
    ui_loop.mark_stopped();
}

/// SIGINT/SIGTERM close the window through the normal quit path
#[cfg(unix)]
fn install_signal_handlers() -> Arc<AtomicBool> {
    use signal_hook::consts::{SIGINT, SIGTERM};

    let flag = Arc::new(AtomicBool::new(false));
    for signal in [SIGINT, SIGTERM] {
        if let Err(err) = signal_hook::flag::register(signal, Arc::clone(&flag)) {
            warn!(signal, error = %err, "Failed to install signal handler");
        }
    }
    flag
}

#[cfg(not(unix))]
fn install_signal_handlers() -> Arc<AtomicBool> {
    Arc::new(AtomicBool::new(false))
}

fn load_window_icon() -> Result<egui::IconData> {
    let icon_bytes: &[u8] = include_bytes!("../../assets/icon.png");
    let decoder = png::Decoder::new(Cursor::new(icon_bytes));
    let mut reader = decoder.read_info().context("Failed to read icon header")?;

    let (color_type, bit_depth) = reader.output_color_type();
    if bit_depth != png::BitDepth::Eight {
        return Err(anyhow!("Unsupported icon bit depth {bit_depth:?} (expected 8)"));
    }
    let (width, height) = (reader.info().width, reader.info().height);
    let mut buf = vec![0; width as usize * height as usize * color_type.samples()];
    let info = reader.next_frame(&mut buf).context("Failed to decode icon")?;
    let pixels = &buf[..info.buffer_size()];

    let rgba = match info.color_type {
        png::ColorType::Rgba => pixels.to_vec(),
        png::ColorType::Rgb => {
            let mut rgba = Vec::with_capacity(pixels.len() / 3 * 4);
            for chunk in pixels.chunks_exact(3) {
                rgba.extend_from_slice(chunk);
                rgba.push(0xFF);
            }
            rgba
        }
        other => {
            return Err(anyhow!(
                "Unsupported icon color type {:?} (expected RGB or RGBA)",
                other
            ));
        }
    };

    Ok(egui::IconData {
        rgba,
        width: info.width,
        height: info.height,
    })
}
