//! Bootstrap controller
//!
//! Brings the process up in a fixed order: storage root, config store,
//! settings catalog, optional presence integration, then the application
//! shell. Presence is torn down from the shell's quit notification, and the
//! controller waits for the UI loop to fully stop before returning its exit
//! code.

use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, info, warn};

use crate::config::{ConfigOverrides, ConfigStore};
use crate::error::{BootstrapError, ShellError};
use crate::presence::{Presence, PresenceClient};
use crate::settings::SettingsCatalog;
use crate::shell::{ApplicationShell, ShellContext};
use crate::storage::StorageRootResolver;

/// Startup stages, in the order they run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    ResolveStorageRoot,
    SetupConfig,
    LoadSettings,
    PresenceInitialize,
    ShellConstruct,
    ShellRun,
    ShellStopped,
}

/// Inputs consumed before the config store exists, plus overrides it layers on top
#[derive(Debug, Clone, Default)]
pub struct LaunchInputs {
    pub storage_root: Option<PathBuf>,
    pub overrides: ConfigOverrides,
}

type StageObserver = Box<dyn FnMut(Stage)>;

pub struct Bootstrap<C, B> {
    resolver: StorageRootResolver,
    inputs: LaunchInputs,
    presence: Arc<Mutex<Presence<C>>>,
    build_shell: B,
    observer: Option<StageObserver>,
}

impl<C, B, S> Bootstrap<C, B>
where
    C: PresenceClient + 'static,
    B: FnOnce(&ShellContext) -> Result<S, ShellError>,
    S: ApplicationShell,
{
    pub fn new(
        resolver: StorageRootResolver,
        inputs: LaunchInputs,
        presence_client: C,
        build_shell: B,
    ) -> Self {
        Self {
            resolver,
            inputs,
            presence: Arc::new(Mutex::new(Presence::new(presence_client))),
            build_shell,
            observer: None,
        }
    }

    /// Report each stage as it starts
    pub fn with_observer(mut self, observer: impl FnMut(Stage) + 'static) -> Self {
        self.observer = Some(Box::new(observer));
        self
    }

    #[cfg(test)]
    pub fn presence_handle(&self) -> Arc<Mutex<Presence<C>>> {
        Arc::clone(&self.presence)
    }

    /// Run the whole lifecycle. Returns the shell's exit code once the UI
    /// loop has fully stopped.
    pub fn run(self) -> Result<i32, BootstrapError> {
        let Bootstrap {
            resolver,
            inputs,
            presence,
            build_shell,
            mut observer,
        } = self;
        let mut enter = |stage: Stage| {
            debug!(?stage, "Bootstrap stage");
            if let Some(observer) = observer.as_mut() {
                observer(stage);
            }
        };

        enter(Stage::ResolveStorageRoot);
        let (storage_root, mode) = resolver.resolve_with_mode(inputs.storage_root.as_deref());
        info!(root = %storage_root.display(), ?mode, "Storage root resolved");

        enter(Stage::SetupConfig);
        let config = Arc::new(ConfigStore::new());
        let presence_enabled = config
            .setup_config(&storage_root, &inputs.overrides)?
            .presence_enabled();

        enter(Stage::LoadSettings);
        let mut catalog = SettingsCatalog::new();
        catalog.load_settings_items(&config)?;
        log_catalog(&catalog);

        if presence_enabled {
            enter(Stage::PresenceInitialize);
            let mut presence = lock(&presence);
            let result = presence.initialize();
            if let Err(err) = result.and_then(|()| presence.set_idle_status()) {
                warn!(error = %err, "Presence integration setup failed");
            }
        } else {
            debug!("Presence integration disabled");
        }

        enter(Stage::ShellConstruct);
        let context = ShellContext {
            config: Arc::clone(&config),
            catalog: Arc::new(catalog),
        };
        let mut shell = build_shell(&context)?;

        let hook_config = Arc::clone(&config);
        let hook_presence = Arc::clone(&presence);
        let registered = shell.on_quit(Box::new(move || {
            // Read at fire time, not captured at registration
            if hook_config.instance().is_some_and(|c| c.presence_enabled()) {
                lock(&hook_presence).shutdown();
            }
        }));
        if !registered {
            return Err(ShellError::QuitHookRejected.into());
        }

        enter(Stage::ShellRun);
        info!("Handing control to the application shell");
        let code = shell.run()?;
        shell.await_quit();

        enter(Stage::ShellStopped);
        info!(code, "Application shell stopped");
        Ok(code)
    }
}

fn lock<C>(presence: &Mutex<Presence<C>>) -> MutexGuard<'_, Presence<C>> {
    presence.lock().unwrap_or_else(PoisonError::into_inner)
}

fn log_catalog(catalog: &SettingsCatalog) {
    for set in catalog.settings() {
        info!(set = %set.title, groups = set.groups.len(), "Settings set loaded");
        for group in &set.groups {
            info!(
                set = %set.title,
                group = %group.title,
                items = group.items.len(),
                "Settings group loaded"
            );
        }
    }
}
