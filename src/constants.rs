//! Application-wide constants
//!
//! Names, file names and fixed values used by the bootstrap sequence,
//! kept in one place so the storage layout is easy to audit.

/// Application identity
pub mod app {
    /// Display name, also used for the installed-mode data directory
    pub const NAME: &str = "Xenia";

    /// Title of the single top-level window
    pub const WINDOW_TITLE: &str = "Xenia";
}

/// Storage root layout
pub mod storage {
    /// Marker file that switches the executable directory into portable mode
    pub const PORTABLE_MARKER: &str = "portable.txt";

    /// Subdirectory appended to the per-user directory in installed mode
    pub const APP_DIR: &str = super::app::NAME;

    /// Guest content directory under the storage root when no override is set
    pub const CONTENT_DIR: &str = "content";

    /// Scratch file used to prove the storage root is writable
    pub const WRITE_PROBE: &str = ".xenia-write-probe";
}

/// Configuration file
pub mod config {
    /// Config file name inside the storage root
    pub const FILENAME: &str = "xenia.config.toml";
}

/// Presence (Discord local RPC) constants
pub mod presence {
    /// Application id registered with the presence service
    pub const CLIENT_ID: &str = "606840046649081857";

    /// IPC socket name prefix, followed by a slot number
    pub const SOCKET_PREFIX: &str = "discord-ipc-";

    /// Number of socket slots probed (discord-ipc-0 .. discord-ipc-9)
    pub const SOCKET_SLOTS: u8 = 10;

    /// RPC protocol version sent in the handshake
    pub const RPC_VERSION: u32 = 1;

    /// Read/write timeout on the presence socket
    pub const IO_TIMEOUT_MS: u64 = 2000;

    /// Maximum frame payload (10 MB) accepted from the service
    pub const MAX_FRAME_SIZE: usize = 10 * 1024 * 1024;

    /// Idle status shown while no title is running
    pub const IDLE_DETAILS: &str = "Standby";
    pub const IDLE_STATE: &str = "Not playing";
    pub const LARGE_IMAGE: &str = "app";
}
