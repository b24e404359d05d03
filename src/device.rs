//! Device and browser attribute snapshots.
//!
//! The pipeline treats these as opaque records supplied by the embedding
//! host and embeds them verbatim in the plaintext. A local default
//! provider is included so the CLI can run end-to-end without a host.

use chrono::{Local, Offset};
use serde::{Deserialize, Serialize};

/// Read-only browser/device attribute snapshot, embedded verbatim.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrowserSnapshot {
    pub user_agent: String,
    pub language: String,
    pub platform: String,
    pub screen_width: u32,
    pub screen_height: u32,
    pub color_depth: u32,
    pub timezone_offset_minutes: i32,
    pub cookies_enabled: bool,
    /// Automation indicator; `None` when the host cannot tell
    pub automation_flag: Option<bool>,
    pub hardware_concurrency: u32,
    #[serde(rename = "deviceMemoryGiB")]
    pub device_memory_gib: f64,
}

impl Default for BrowserSnapshot {
    fn default() -> Self {
        Self {
            user_agent: String::new(),
            language: "en-US".to_string(),
            platform: String::new(),
            screen_width: 1920,
            screen_height: 1080,
            color_depth: 24,
            timezone_offset_minutes: 0,
            cookies_enabled: true,
            automation_flag: None,
            hardware_concurrency: 4,
            device_memory_gib: 4.0,
        }
    }
}

impl BrowserSnapshot {
    /// Synthesize a snapshot from the local machine.
    ///
    /// Fills in hostname-derived platform/user-agent strings and the local
    /// timezone offset; everything else keeps the defaults.
    pub fn detect() -> Self {
        let host = hostname::get()
            .map(|h| h.to_string_lossy().to_string())
            .unwrap_or_else(|_| "unknown".to_string());

        // chrono reports the offset east of UTC; the browser convention is
        // minutes *behind* UTC, so the sign flips.
        let offset_secs = Local::now().offset().fix().local_minus_utc();
        let timezone_offset_minutes = -offset_secs / 60;

        Self {
            user_agent: format!("agegate-client/{} ({host})", env!("CARGO_PKG_VERSION")),
            platform: std::env::consts::OS.to_string(),
            timezone_offset_minutes,
            hardware_concurrency: std::thread::available_parallelism()
                .map(|n| n.get() as u32)
                .unwrap_or(4),
            ..Self::default()
        }
    }
}

/// Media capture device description, embedded verbatim.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaDeviceInfo {
    pub device_id: String,
    pub group_id: String,
    pub kind: String,
    pub label: String,
}

impl Default for MediaDeviceInfo {
    fn default() -> Self {
        Self {
            device_id: "default".to_string(),
            group_id: String::new(),
            kind: "videoinput".to_string(),
            label: "FaceTime HD Camera".to_string(),
        }
    }
}
