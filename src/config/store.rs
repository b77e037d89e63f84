//! Write-once configuration store bound to the storage root

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use tracing::{debug, info};

use super::options::{ConfigOverrides, Options};
use crate::constants::{config::FILENAME, storage};
use crate::error::ConfigError;

/// Loaded configuration: file-backed values plus command-line overrides
#[derive(Debug, Clone)]
pub struct Config {
    storage_root: PathBuf,
    config_path: PathBuf,
    /// What is on disk (overrides excluded)
    persisted: Options,
    /// What readers see
    effective: Options,
}

impl Config {
    pub fn storage_root(&self) -> &Path {
        &self.storage_root
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn options(&self) -> &Options {
        &self.effective
    }

    /// Whether command-line overrides changed anything
    pub fn has_overrides(&self) -> bool {
        self.effective != self.persisted
    }

    #[cfg(test)]
    pub fn persisted(&self) -> &Options {
        &self.persisted
    }

    pub fn presence_enabled(&self) -> bool {
        self.effective.general.discord
    }

    pub fn show_debug_tab(&self) -> bool {
        self.effective.general.show_debug_tab
    }

    pub fn fullscreen(&self) -> bool {
        self.effective.gpu.fullscreen
    }

    /// Guest content root: the configured path, or `content` under the storage root
    pub fn content_root(&self) -> PathBuf {
        let configured = &self.effective.storage.content_root;
        if configured.as_os_str().is_empty() {
            self.storage_root.join(storage::CONTENT_DIR)
        } else if configured.is_absolute() {
            configured.clone()
        } else {
            std::path::absolute(configured).unwrap_or_else(|_| configured.clone())
        }
    }

    fn load(root: &Path, overrides: &ConfigOverrides) -> Result<Self, ConfigError> {
        fs::create_dir_all(root).map_err(|source| ConfigError::StorageRoot {
            path: root.to_path_buf(),
            source,
        })?;
        probe_writable(root)?;

        let config_path = root.join(FILENAME);
        let persisted = match fs::read_to_string(&config_path) {
            Ok(contents) => {
                // A broken file is preserved for the user to fix
                let options = toml::from_str::<Options>(&contents).map_err(|source| {
                    ConfigError::Parse {
                        path: config_path.clone(),
                        source,
                    }
                })?;
                info!(path = %config_path.display(), "Loaded config file");
                options
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                info!(path = %config_path.display(), "Config file not found, creating default");
                Options::default()
            }
            Err(source) => {
                return Err(ConfigError::Read {
                    path: config_path,
                    source,
                });
            }
        };

        save(&config_path, &persisted)?;

        let mut effective = persisted.clone();
        if !overrides.is_empty() {
            debug!(overrides = ?overrides, "Applying command-line overrides");
            overrides.apply(&mut effective);
        }

        Ok(Self {
            storage_root: root.to_path_buf(),
            config_path,
            persisted,
            effective,
        })
    }
}

fn probe_writable(root: &Path) -> Result<(), ConfigError> {
    let probe = root.join(storage::WRITE_PROBE);
    fs::write(&probe, b"").map_err(|source| ConfigError::NotWritable {
        path: root.to_path_buf(),
        source,
    })?;
    let _ = fs::remove_file(&probe);
    Ok(())
}

fn save(path: &Path, options: &Options) -> Result<(), ConfigError> {
    let contents = toml::to_string_pretty(options)?;
    fs::write(path, contents).map_err(|source| ConfigError::Write {
        path: path.to_path_buf(),
        source,
    })
}

/// Holds the configuration for the process. Set up exactly once.
#[derive(Debug, Default)]
pub struct ConfigStore {
    loaded: OnceLock<Config>,
}

impl ConfigStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind the store to `root`, load the file under it and layer `overrides` on top.
    /// A second call is rejected whatever root it names.
    pub fn setup_config(
        &self,
        root: &Path,
        overrides: &ConfigOverrides,
    ) -> Result<&Config, ConfigError> {
        if let Some(current) = self.loaded.get() {
            return Err(ConfigError::AlreadyInitialized {
                current: current.storage_root.clone(),
                requested: root.to_path_buf(),
            });
        }

        let config = Config::load(root, overrides)?;
        if let Err(rejected) = self.loaded.set(config) {
            return Err(ConfigError::AlreadyInitialized {
                current: self.storage_root().unwrap_or_default(),
                requested: rejected.storage_root,
            });
        }

        let config = self.loaded.get().ok_or_else(|| ConfigError::AlreadyInitialized {
            current: PathBuf::new(),
            requested: root.to_path_buf(),
        })?;
        info!(root = %config.storage_root.display(), "Config store ready");
        Ok(config)
    }

    /// The loaded configuration, `None` before `setup_config` succeeded
    pub fn instance(&self) -> Option<&Config> {
        self.loaded.get()
    }

    pub fn storage_root(&self) -> Option<PathBuf> {
        self.instance().map(|c| c.storage_root.clone())
    }
}
