//! Mixer JSON API: events, their parameters and the request envelope

pub mod event;
pub mod params;

pub use event::{Action, Event, EventBody, Request};
pub use params::{
    AudioEncoderOptions, ChannelConfig, ResamplerOptions, VideoEncoderOptions,
};
