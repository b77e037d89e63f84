//! Presence RPC payloads

use serde::{Deserialize, Serialize};

/// Frame opcodes of the local RPC transport
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Opcode {
    Handshake = 0,
    Frame = 1,
    Close = 2,
    Ping = 3,
    Pong = 4,
}

impl TryFrom<u32> for Opcode {
    type Error = anyhow::Error;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Ok(match value {
            0 => Opcode::Handshake,
            1 => Opcode::Frame,
            2 => Opcode::Close,
            3 => Opcode::Ping,
            4 => Opcode::Pong,
            other => anyhow::bail!("Unknown presence opcode {other}"),
        })
    }
}

/// Status shown on the user's profile
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Activity {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assets: Option<ActivityAssets>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct ActivityAssets {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub large_image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub large_text: Option<String>,
}

/// Opening frame sent right after connecting
#[derive(Serialize, Debug)]
pub struct Handshake<'a> {
    pub v: u32,
    pub client_id: &'a str,
}

/// `SET_ACTIVITY` command
#[derive(Serialize, Debug)]
pub struct SetActivity<'a> {
    pub cmd: &'static str,
    pub args: SetActivityArgs<'a>,
    pub nonce: String,
}

#[derive(Serialize, Debug)]
pub struct SetActivityArgs<'a> {
    pub pid: u32,
    pub activity: &'a Activity,
}

/// Any frame received from the service
#[derive(Deserialize, Debug, Default)]
pub struct Reply {
    #[serde(default)]
    pub evt: Option<String>,
    #[serde(default)]
    pub data: Option<serde_json::Value>,
}

impl Reply {
    pub fn is_ready(&self) -> bool {
        self.evt.as_deref() == Some("READY")
    }

    pub fn is_error(&self) -> bool {
        self.evt.as_deref() == Some("ERROR")
    }

    /// Error message carried in `data.message`, if any
    pub fn error_message(&self) -> String {
        self.data
            .as_ref()
            .and_then(|d| d.get("message"))
            .and_then(|m| m.as_str())
            .unwrap_or("unknown error")
            .to_string()
    }
}
