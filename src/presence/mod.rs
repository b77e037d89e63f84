//! Presence integration
//!
//! Optional status reporting to an external service. [`Presence`] wraps a
//! [`PresenceClient`] and enforces the lifecycle
//! `Uninitialized -> Active -> Terminated`. Failures to reach the service
//! are logged and degrade the feature to `Unavailable`; they never abort
//! startup or shutdown.

mod ipc;
mod messages;

pub use ipc::DiscordIpcClient;
pub use messages::{Activity, ActivityAssets};

use std::fmt;

use anyhow::Result;
use tracing::{info, warn};

use crate::constants::app;
use crate::constants::presence::{IDLE_DETAILS, IDLE_STATE, LARGE_IMAGE};
use crate::error::PresenceError;

/// Transport to a presence service
pub trait PresenceClient: Send {
    fn connect(&mut self) -> Result<()>;
    fn set_activity(&mut self, activity: &Activity) -> Result<()>;
    /// Close the connection. Must not block for long, it runs on the UI thread.
    fn disconnect(&mut self);
}

impl<C: PresenceClient + ?Sized> PresenceClient for Box<C> {
    fn connect(&mut self) -> Result<()> {
        (**self).connect()
    }

    fn set_activity(&mut self, activity: &Activity) -> Result<()> {
        (**self).set_activity(activity)
    }

    fn disconnect(&mut self) {
        (**self).disconnect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresenceState {
    Uninitialized,
    Active,
    /// Initialize was attempted but the service could not be reached
    Unavailable,
    Terminated,
}

impl fmt::Display for PresenceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PresenceState::Uninitialized => "uninitialized",
            PresenceState::Active => "active",
            PresenceState::Unavailable => "unavailable",
            PresenceState::Terminated => "terminated",
        };
        f.write_str(name)
    }
}

pub struct Presence<C> {
    client: C,
    state: PresenceState,
}

impl<C: PresenceClient> Presence<C> {
    pub fn new(client: C) -> Self {
        Self {
            client,
            state: PresenceState::Uninitialized,
        }
    }

    pub fn state(&self) -> PresenceState {
        self.state
    }

    /// Connect to the service. Only valid once, from `Uninitialized`.
    /// A connection failure is logged and leaves the integration `Unavailable`.
    pub fn initialize(&mut self) -> Result<(), PresenceError> {
        if self.state != PresenceState::Uninitialized {
            return Err(PresenceError::OutOfOrder {
                operation: "initialize",
                state: self.state,
            });
        }

        match self.client.connect() {
            Ok(()) => {
                info!("Presence integration connected");
                self.state = PresenceState::Active;
            }
            Err(err) => {
                let err = PresenceError::Client(err);
                warn!(error = %err, "Continuing without presence reporting");
                self.state = PresenceState::Unavailable;
            }
        }
        Ok(())
    }

    /// Report the idle ("not playing") status
    pub fn set_idle_status(&mut self) -> Result<(), PresenceError> {
        match self.state {
            PresenceState::Active => {
                if let Err(err) = self.client.set_activity(&idle_activity()) {
                    let err = PresenceError::Client(err);
                    warn!(error = %err, "Failed to update presence status");
                }
                Ok(())
            }
            PresenceState::Unavailable => Ok(()),
            state => Err(PresenceError::OutOfOrder {
                operation: "set_idle_status",
                state,
            }),
        }
    }

    /// Disconnect. A no-op unless the integration is `Active`.
    pub fn shutdown(&mut self) {
        if self.state != PresenceState::Active {
            return;
        }
        self.client.disconnect();
        self.state = PresenceState::Terminated;
        info!("Presence integration shut down");
    }
}

fn idle_activity() -> Activity {
    Activity {
        details: Some(IDLE_DETAILS.to_string()),
        state: Some(IDLE_STATE.to_string()),
        assets: Some(ActivityAssets {
            large_image: Some(LARGE_IMAGE.to_string()),
            large_text: Some(app::NAME.to_string()),
        }),
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    /// Records every call into a shared log
    pub(crate) struct SpyClient {
        pub log: Arc<Mutex<Vec<String>>>,
        pub fail_connect: bool,
    }

    impl SpyClient {
        pub fn new(log: Arc<Mutex<Vec<String>>>) -> Self {
            Self { log, fail_connect: false }
        }

        fn record(&self, entry: &str) {
            self.log.lock().unwrap().push(entry.to_string());
        }
    }

    impl PresenceClient for SpyClient {
        fn connect(&mut self) -> Result<()> {
            self.record("presence.connect");
            if self.fail_connect {
                anyhow::bail!("no presence service listening");
            }
            Ok(())
        }

        fn set_activity(&mut self, activity: &Activity) -> Result<()> {
            self.record(&format!(
                "presence.set_activity:{}",
                activity.state.as_deref().unwrap_or("")
            ));
            Ok(())
        }

        fn disconnect(&mut self) {
            self.record("presence.disconnect");
        }
    }

    fn entries(log: &Arc<Mutex<Vec<String>>>) -> Vec<String> {
        log.lock().unwrap().clone()
    }

    #[test]
    fn test_shutdown_without_initialize_is_noop() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut presence = Presence::new(SpyClient::new(log.clone()));

        presence.shutdown();

        assert_eq!(presence.state(), PresenceState::Uninitialized);
        assert!(entries(&log).is_empty());
    }

    #[test]
    fn test_initialize_then_double_shutdown() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut presence = Presence::new(SpyClient::new(log.clone()));

        presence.initialize().unwrap();
        assert_eq!(presence.state(), PresenceState::Active);
        presence.set_idle_status().unwrap();
        presence.shutdown();
        presence.shutdown();

        assert_eq!(presence.state(), PresenceState::Terminated);
        assert_eq!(
            entries(&log),
            vec![
                "presence.connect",
                "presence.set_activity:Not playing",
                "presence.disconnect",
            ]
        );
    }

    #[test]
    fn test_no_reactivation_after_terminate() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut presence = Presence::new(SpyClient::new(log.clone()));

        presence.initialize().unwrap();
        presence.shutdown();

        assert!(matches!(
            presence.initialize(),
            Err(PresenceError::OutOfOrder { state: PresenceState::Terminated, .. })
        ));
        assert!(presence.set_idle_status().is_err());
        assert_eq!(entries(&log).iter().filter(|e| *e == "presence.connect").count(), 1);
    }

    #[test]
    fn test_status_before_initialize_rejected() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut presence = Presence::new(SpyClient::new(log.clone()));

        let err = presence.set_idle_status().unwrap_err();
        assert!(matches!(
            err,
            PresenceError::OutOfOrder {
                operation: "set_idle_status",
                state: PresenceState::Uninitialized
            }
        ));
        assert!(entries(&log).is_empty());
    }

    #[test]
    fn test_connect_failure_is_swallowed() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut client = SpyClient::new(log.clone());
        client.fail_connect = true;
        let mut presence = Presence::new(client);

        assert!(presence.initialize().is_ok());
        assert_eq!(presence.state(), PresenceState::Unavailable);

        // Degraded: status updates skipped, shutdown does nothing
        assert!(presence.set_idle_status().is_ok());
        presence.shutdown();
        assert_eq!(entries(&log), vec!["presence.connect"]);
    }
}
