//! Settings catalog
//!
//! Read-only tree describing user-facing settings: sets contain ordered
//! groups, groups contain items bound to config options. Built from the
//! loaded configuration, so it can only be loaded after the config store.

use tracing::{debug, warn};

use crate::config::options::{APU_BACKENDS, GPU_BACKENDS, HID_BACKENDS};
use crate::config::{ConfigStore, OptionValue};
use crate::error::SettingsError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemKind {
    Switch,
    Choice(&'static [&'static str]),
    Path,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SettingsItem {
    pub title: &'static str,
    pub description: &'static str,
    pub section: &'static str,
    pub key: &'static str,
    pub kind: ItemKind,
    /// Snapshot of the option value at load time
    pub value: OptionValue,
    /// False when a choice item holds a value outside its known choices
    pub recognized: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SettingsGroup {
    pub title: String,
    pub items: Vec<SettingsItem>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SettingsSet {
    pub title: String,
    pub groups: Vec<SettingsGroup>,
}

struct ItemSpec {
    title: &'static str,
    description: &'static str,
    section: &'static str,
    key: &'static str,
    kind: ItemKind,
}

struct GroupSpec {
    title: &'static str,
    items: &'static [ItemSpec],
}

struct SetSpec {
    title: &'static str,
    groups: &'static [GroupSpec],
}

const LAYOUT: &[SetSpec] = &[
    SetSpec {
        title: "General",
        groups: &[
            GroupSpec {
                title: "Integrations",
                items: &[ItemSpec {
                    title: "Discord Rich Presence",
                    description: "Show the emulator status on your Discord profile",
                    section: "General",
                    key: "discord",
                    kind: ItemKind::Switch,
                }],
            },
            GroupSpec {
                title: "Interface",
                items: &[ItemSpec {
                    title: "Show Debug Tab",
                    description: "Show the debug tab in the main window",
                    section: "General",
                    key: "show_debug_tab",
                    kind: ItemKind::Switch,
                }],
            },
        ],
    },
    SetSpec {
        title: "Graphics",
        groups: &[
            GroupSpec {
                title: "Backend",
                items: &[ItemSpec {
                    title: "Graphics System",
                    description: "Graphics backend used for guest rendering",
                    section: "GPU",
                    key: "gpu",
                    kind: ItemKind::Choice(GPU_BACKENDS),
                }],
            },
            GroupSpec {
                title: "Display",
                items: &[ItemSpec {
                    title: "Fullscreen",
                    description: "Start the main window fullscreen",
                    section: "GPU",
                    key: "fullscreen",
                    kind: ItemKind::Switch,
                }],
            },
        ],
    },
    SetSpec {
        title: "Audio",
        groups: &[GroupSpec {
            title: "Backend",
            items: &[ItemSpec {
                title: "Audio System",
                description: "Audio backend used for guest playback",
                section: "APU",
                key: "apu",
                kind: ItemKind::Choice(APU_BACKENDS),
            }],
        }],
    },
    SetSpec {
        title: "Input",
        groups: &[GroupSpec {
            title: "Backend",
            items: &[ItemSpec {
                title: "Input System",
                description: "Input backend used for controllers",
                section: "HID",
                key: "hid",
                kind: ItemKind::Choice(HID_BACKENDS),
            }],
        }],
    },
    SetSpec {
        title: "Storage",
        groups: &[GroupSpec {
            title: "Content",
            items: &[ItemSpec {
                title: "Content Root",
                description: "Where guest content (saves, etc.) is stored",
                section: "Storage",
                key: "content_root",
                kind: ItemKind::Path,
            }],
        }],
    },
];

#[derive(Debug, Default)]
pub struct SettingsCatalog {
    sets: Vec<SettingsSet>,
    loaded: bool,
}

impl SettingsCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the catalog from the loaded configuration.
    ///
    /// Fails with [`SettingsError::ConfigNotReady`] if `config` has not been
    /// set up; the catalog is left unloaded in that case.
    pub fn load_settings_items(&mut self, config: &ConfigStore) -> Result<(), SettingsError> {
        let config = config.instance().ok_or(SettingsError::ConfigNotReady)?;
        if self.loaded {
            return Err(SettingsError::AlreadyLoaded);
        }

        let options = config.options();
        self.sets = LAYOUT
            .iter()
            .map(|set| SettingsSet {
                title: set.title.to_string(),
                groups: set
                    .groups
                    .iter()
                    .map(|group| SettingsGroup {
                        title: group.title.to_string(),
                        items: group
                            .items
                            .iter()
                            .filter_map(|spec| {
                                let Some(value) = options.value(spec.section, spec.key) else {
                                    warn!(
                                        section = spec.section,
                                        key = spec.key,
                                        "Settings item references unknown option, skipping"
                                    );
                                    return None;
                                };
                                Some(build_item(spec, value))
                            })
                            .collect(),
                    })
                    .collect(),
            })
            .collect();
        self.loaded = true;

        debug!(sets = self.sets.len(), "Settings catalog loaded");
        Ok(())
    }

    #[cfg(test)]
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn settings(&self) -> &[SettingsSet] {
        &self.sets
    }

    #[cfg(test)]
    pub fn find_set(&self, title: &str) -> Option<&SettingsSet> {
        self.sets.iter().find(|set| set.title == title)
    }
}

fn build_item(spec: &ItemSpec, value: OptionValue) -> SettingsItem {
    let recognized = match (&spec.kind, &value) {
        (ItemKind::Choice(choices), OptionValue::Text(current)) => {
            let known = choices.iter().any(|choice| *choice == current.as_str());
            if !known {
                warn!(
                    section = spec.section,
                    key = spec.key,
                    value = %current,
                    choices = ?choices,
                    "Option value is not a known choice"
                );
            }
            known
        }
        _ => true,
    };

    SettingsItem {
        title: spec.title,
        description: spec.description,
        section: spec.section,
        key: spec.key,
        kind: spec.kind,
        value,
        recognized,
    }
}
