//! UI font discovery via fontconfig
//!
//! Resolve a preferred family to a font file and install it ahead of egui's
//! bundled fonts. Missing fonts are never fatal.

use std::ffi::CString;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use eframe::egui;
use fontconfig::{Fontconfig, Pattern};
use tracing::{debug, info, warn};

use super::constants::PREFERRED_UI_FONTS;

/// Find the font file for a family name
pub fn find_font_path(family: &str) -> Result<PathBuf> {
    let fc = Fontconfig::new().context("Failed to initialize fontconfig")?;

    let mut pattern = Pattern::new(&fc);
    let family_cstr =
        CString::new(family).with_context(|| format!("Invalid family name: {}", family))?;
    pattern.add_string(fontconfig::FC_FAMILY, &family_cstr);

    let matched = pattern.font_match();

    // fontconfig falls back to some other family when the requested one is missing
    if let Some(matched_family) = matched.get_string(fontconfig::FC_FAMILY)
        && !matched_family.eq_ignore_ascii_case(family)
    {
        return Err(anyhow::anyhow!(
            "Font '{}' not found - fontconfig returned family '{}' instead",
            family,
            matched_family
        ));
    }

    let path = PathBuf::from(
        matched
            .filename()
            .with_context(|| format!("No font file found for '{}'", family))?,
    );
    if !path.exists() {
        return Err(anyhow::anyhow!(
            "Font file path '{}' does not exist",
            path.display()
        ));
    }

    debug!(family, path = %path.display(), "Resolved font path");
    Ok(path)
}

/// First preferred family that resolves and reads, with its bytes
fn load_preferred_font() -> Option<(&'static str, Vec<u8>)> {
    for family in PREFERRED_UI_FONTS {
        let loaded = find_font_path(family).and_then(|path| {
            std::fs::read(&path).with_context(|| format!("Failed to read {}", path.display()))
        });
        match loaded {
            Ok(bytes) => return Some((family, bytes)),
            Err(err) => debug!(family, error = %err, "UI font unavailable"),
        }
    }
    None
}

/// Install the preferred UI font. Returns the family used, if any.
pub fn install_ui_fonts(ctx: &egui::Context) -> Option<&'static str> {
    let Some((family, bytes)) = load_preferred_font() else {
        warn!(tried = ?PREFERRED_UI_FONTS, "No preferred UI font found, using built-in fonts");
        return None;
    };

    let mut fonts = egui::FontDefinitions::default();
    fonts
        .font_data
        .insert(family.to_owned(), Arc::new(egui::FontData::from_owned(bytes)));
    fonts
        .families
        .entry(egui::FontFamily::Proportional)
        .or_default()
        .insert(0, family.to_owned());
    ctx.set_fonts(fonts);

    info!(family, "UI font loaded");
    Some(family)
}
