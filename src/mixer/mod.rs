//! Mixer control over the JSON/TCP API

pub mod connector;
pub mod transport;

pub use connector::Connector;
