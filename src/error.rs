//! Error taxonomy for the bootstrap sequence
//!
//! Config and shell errors are fatal and abort startup. Presence errors are
//! only ever logged. Settings errors signal a broken call order.

use std::path::PathBuf;

use thiserror::Error;

use crate::presence::PresenceState;

/// Top-level error returned by the bootstrap controller.
#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Settings error: {0}")]
    Settings(#[from] SettingsError),

    #[error("Shell error: {0}")]
    Shell(#[from] ShellError),
}

/// The storage root cannot back the config store.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(
        "config store already initialized with {}, refusing {}",
        .current.display(),
        .requested.display()
    )]
    AlreadyInitialized { current: PathBuf, requested: PathBuf },

    #[error("failed to create storage root {}", .path.display())]
    StorageRoot {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("storage root {} is not writable", .path.display())]
    NotWritable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read config file {}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {} (file left untouched)", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to serialize config")]
    Serialize(#[from] toml::ser::Error),

    #[error("failed to write config file {}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Settings catalog misuse.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SettingsError {
    #[error("settings catalog loaded before the config store was set up")]
    ConfigNotReady,

    #[error("settings catalog already loaded")]
    AlreadyLoaded,
}

/// Presence integration failures. Never fatal.
#[derive(Debug, Error)]
pub enum PresenceError {
    #[error("presence {operation} called while {state}")]
    OutOfOrder {
        operation: &'static str,
        state: PresenceState,
    },

    #[error("presence service unavailable: {0:#}")]
    Client(#[from] anyhow::Error),
}

/// The UI could not be brought up.
#[derive(Debug, Error)]
pub enum ShellError {
    #[error("failed to construct application shell: {0}")]
    Construction(String),

    #[error("application shell already ran")]
    AlreadyRan,

    #[error("application shell refused the quit listener")]
    QuitHookRejected,
}
