//! # RMixer
//!
//! Control client for a remote audio/video mixer and for UltraGrid, the
//! video transmission helper that feeds it.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌──────────────────────────────┐          ┌────────────────────────────┐
//! │        protocol::Event       │          │   ultragrid::UltraGridClient│
//! │  typed Action + params,      │          │   POST /ultragrid/gui/*     │
//! │  optional filterId / delay   │          │   GET  /ultragrid/gui/state │
//! └──────────────┬───────────────┘          └──────────────┬─────────────┘
//!                │                                         │
//!                ▼                                         ▼
//! ┌──────────────────────────────┐          ┌────────────────────────────┐
//! │      mixer::Connector        │          │   ultragrid::probe          │
//! │  queue, {"events": [...]},   │          │   availability check, then  │
//! │  one TCP connection per call │          │   priority list of uv cmds  │
//! └──────────────┬───────────────┘          └──────────────┬─────────────┘
//!                │ JSON over TCP                           │ HTTP
//!                ▼                                         ▼
//!          remote mixer                              far-end UltraGrid
//! ```

pub mod config;
pub mod error;
pub mod mixer;
pub mod protocol;
pub mod ultragrid;

pub use error::{Error, MixerError, Result, UltraGridError};
pub use mixer::Connector;
pub use protocol::{Action, Event, Request};
pub use ultragrid::UltraGridClient;

/// Library-wide constants
pub mod constants {
    /// Default mixer control port
    pub const DEFAULT_MIXER_PORT: u16 = 7777;

    /// Largest mixer reply accepted, in bytes
    pub const MAX_RESPONSE_SIZE: usize = 4096 * 4;

    /// Default mixer request deadline in milliseconds
    pub const DEFAULT_MIXER_TIMEOUT_MS: u64 = 5_000;

    /// Default UltraGrid request deadline in milliseconds
    pub const DEFAULT_ULTRAGRID_TIMEOUT_MS: u64 = 10_000;

    /// Host used when the caller leaves the UltraGrid address empty
    pub const DEFAULT_ULTRAGRID_HOST: &str = "127.0.0.1";

    /// Public address used to discover which local interface routes outwards.
    /// Nothing is ever sent to it.
    pub const LOCAL_IP_PROBE_TARGET: &str = "64.233.187.99:1";

    /// Path prefix of the UltraGrid control GUI
    pub const ULTRAGRID_GUI_PATH: &str = "/ultragrid/gui";
}
