//! Command-line inputs

use std::path::PathBuf;

use clap::Parser;
use clap::builder::PossibleValuesParser;

use crate::bootstrap::LaunchInputs;
use crate::config::ConfigOverrides;
use crate::config::options::{APU_BACKENDS, GPU_BACKENDS, HID_BACKENDS};

#[derive(Parser, Debug, Default)]
#[command(name = "xenia")]
#[command(version)]
#[command(about = "Xenia application shell", long_about = None)]
pub struct Cli {
    /// Storage root for config and content (default: executable dir when
    /// portable, otherwise the user data dir joined with Xenia)
    #[arg(long, value_name = "DIR")]
    pub storage_root: Option<PathBuf>,

    /// Treat the executable directory as the storage root
    #[arg(long)]
    pub portable: bool,

    /// Root directory for guest content
    #[arg(long, value_name = "DIR")]
    pub content_root: Option<PathBuf>,

    /// Enable Discord rich presence
    #[arg(long, value_name = "BOOL")]
    pub discord: Option<bool>,

    /// Show the debug tab
    #[arg(long, value_name = "BOOL")]
    pub show_debug_tab: Option<bool>,

    /// Start fullscreen
    #[arg(long, value_name = "BOOL")]
    pub fullscreen: Option<bool>,

    /// Audio backend
    #[arg(long, value_parser = PossibleValuesParser::new(APU_BACKENDS.iter().copied()))]
    pub apu: Option<String>,

    /// Graphics backend
    #[arg(long, value_parser = PossibleValuesParser::new(GPU_BACKENDS.iter().copied()))]
    pub gpu: Option<String>,

    /// Input backend
    #[arg(long, value_parser = PossibleValuesParser::new(HID_BACKENDS.iter().copied()))]
    pub hid: Option<String>,

    /// Log level (trace, debug, info, warn, error); overrides LOG_LEVEL
    #[arg(long, value_name = "LEVEL")]
    pub log_level: Option<String>,
}

impl Cli {
    /// Values merged over the config file, in memory only
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            discord: self.discord,
            show_debug_tab: self.show_debug_tab,
            apu: self.apu.clone(),
            gpu: self.gpu.clone(),
            fullscreen: self.fullscreen,
            hid: self.hid.clone(),
            content_root: self.content_root.clone(),
        }
    }

    pub fn launch_inputs(&self) -> LaunchInputs {
        LaunchInputs {
            storage_root: self.storage_root.clone(),
            overrides: self.overrides(),
        }
    }
}
