//! UltraGrid control: REST client and transmission probe

pub mod client;
pub mod probe;

pub use client::{CheckReply, UltraGridClient};
pub use probe::{check_and_transmit, local_ip, UV_CMD_PRIORITY_LIST};
