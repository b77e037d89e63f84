//! Persisted option schema and command-line overrides
//!
//! Sections mirror the categories options are declared under. Every field
//! has a serde default so older config files gain new keys on the next save.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

pub const APU_BACKENDS: &[&str] = &["any", "nop", "sdl", "xaudio2"];
pub const GPU_BACKENDS: &[&str] = &["any", "d3d12", "vulkan", "null"];
pub const HID_BACKENDS: &[&str] = &["any", "nop", "sdl", "winkey", "xinput"];

/// All file-backed options
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Options {
    #[serde(rename = "General", default)]
    pub general: GeneralOptions,
    #[serde(rename = "APU", default)]
    pub apu: ApuOptions,
    #[serde(rename = "GPU", default)]
    pub gpu: GpuOptions,
    #[serde(rename = "HID", default)]
    pub hid: HidOptions,
    #[serde(rename = "Storage", default)]
    pub storage: StorageOptions,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneralOptions {
    /// Enable Discord rich presence
    #[serde(default = "default_true")]
    pub discord: bool,
    /// Show the debug tab in the UI
    #[serde(default = "default_true")]
    pub show_debug_tab: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApuOptions {
    #[serde(default = "default_backend")]
    pub apu: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GpuOptions {
    #[serde(default = "default_backend")]
    pub gpu: String,
    #[serde(default)]
    pub fullscreen: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HidOptions {
    #[serde(default = "default_backend")]
    pub hid: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StorageOptions {
    /// Guest content root; empty means `<storage root>/content`
    #[serde(default)]
    pub content_root: PathBuf,
}

fn default_true() -> bool {
    true
}

fn default_backend() -> String {
    "any".to_string()
}

impl Default for GeneralOptions {
    fn default() -> Self {
        Self {
            discord: default_true(),
            show_debug_tab: default_true(),
        }
    }
}

impl Default for ApuOptions {
    fn default() -> Self {
        Self { apu: default_backend() }
    }
}

impl Default for GpuOptions {
    fn default() -> Self {
        Self {
            gpu: default_backend(),
            fullscreen: false,
        }
    }
}

impl Default for HidOptions {
    fn default() -> Self {
        Self { hid: default_backend() }
    }
}

/// A single option value, as seen by readers that address options by name
#[derive(Debug, Clone, PartialEq)]
pub enum OptionValue {
    Bool(bool),
    Text(String),
    Path(PathBuf),
}

impl fmt::Display for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionValue::Bool(value) => write!(f, "{value}"),
            OptionValue::Text(value) => f.write_str(value),
            OptionValue::Path(path) if path.as_os_str().is_empty() => f.write_str("(default)"),
            OptionValue::Path(path) => write!(f, "{}", path.display()),
        }
    }
}

impl Options {
    /// Look up an option by section and key
    pub fn value(&self, section: &str, key: &str) -> Option<OptionValue> {
        let value = match (section, key) {
            ("General", "discord") => OptionValue::Bool(self.general.discord),
            ("General", "show_debug_tab") => OptionValue::Bool(self.general.show_debug_tab),
            ("APU", "apu") => OptionValue::Text(self.apu.apu.clone()),
            ("GPU", "gpu") => OptionValue::Text(self.gpu.gpu.clone()),
            ("GPU", "fullscreen") => OptionValue::Bool(self.gpu.fullscreen),
            ("HID", "hid") => OptionValue::Text(self.hid.hid.clone()),
            ("Storage", "content_root") => OptionValue::Path(self.storage.content_root.clone()),
            _ => return None,
        };
        Some(value)
    }
}

/// Values supplied on the command line. `None` leaves the file value alone.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigOverrides {
    pub discord: Option<bool>,
    pub show_debug_tab: Option<bool>,
    pub apu: Option<String>,
    pub gpu: Option<String>,
    pub fullscreen: Option<bool>,
    pub hid: Option<String>,
    pub content_root: Option<PathBuf>,
}

impl ConfigOverrides {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Layer the overrides on top of `options`
    pub fn apply(&self, options: &mut Options) {
        if let Some(discord) = self.discord {
            options.general.discord = discord;
        }
        if let Some(show) = self.show_debug_tab {
            options.general.show_debug_tab = show;
        }
        if let Some(apu) = &self.apu {
            options.apu.apu = apu.clone();
        }
        if let Some(gpu) = &self.gpu {
            options.gpu.gpu = gpu.clone();
        }
        if let Some(fullscreen) = self.fullscreen {
            options.gpu.fullscreen = fullscreen;
        }
        if let Some(hid) = &self.hid {
            options.hid.hid = hid.clone();
        }
        if let Some(content_root) = &self.content_root {
            options.storage.content_root = content_root.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_sections_use_defaults() {
        let options: Options = toml::from_str("[GPU]\nfullscreen = true\n").unwrap();
        assert!(options.gpu.fullscreen);
        assert_eq!(options.gpu.gpu, "any");
        assert!(options.general.discord);
        assert!(options.general.show_debug_tab);
        assert_eq!(options.hid.hid, "any");
        assert!(options.storage.content_root.as_os_str().is_empty());
    }

    #[test]
    fn test_sections_serialize_with_category_names() {
        let text = toml::to_string_pretty(&Options::default()).unwrap();
        assert!(text.contains("[General]"));
        assert!(text.contains("[APU]"));
        assert!(text.contains("[GPU]"));
        assert!(text.contains("[HID]"));
        assert!(text.contains("[Storage]"));
    }

    #[test]
    fn test_overrides_replace_only_given_values() {
        let mut options = Options::default();
        options.apu.apu = "sdl".to_string();

        let overrides = ConfigOverrides {
            discord: Some(false),
            gpu: Some("vulkan".to_string()),
            ..Default::default()
        };
        overrides.apply(&mut options);

        assert!(!options.general.discord);
        assert_eq!(options.gpu.gpu, "vulkan");
        assert_eq!(options.apu.apu, "sdl");
        assert!(options.general.show_debug_tab);
    }

    #[test]
    fn test_value_lookup() {
        let options = Options::default();
        assert_eq!(options.value("General", "discord"), Some(OptionValue::Bool(true)));
        assert_eq!(options.value("HID", "hid"), Some(OptionValue::Text("any".into())));
        assert_eq!(options.value("GPU", "nope"), None);
    }

    #[test]
    fn test_empty_path_displays_as_default() {
        assert_eq!(OptionValue::Path(PathBuf::new()).to_string(), "(default)");
        assert_eq!(OptionValue::Bool(false).to_string(), "false");
    }
}
