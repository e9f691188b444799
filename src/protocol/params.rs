//! Parameter payloads of the mixer actions
//!
//! Every struct serializes to the exact `params` object the mixer expects,
//! keys in camelCase.

use serde::{Deserialize, Serialize};

/// Empty parameter object, serialized as `{}`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NoParams {}

/// One RTP subsession of an `addSession` request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RtpSubsession {
    pub port: u16,
    pub medium: String,
    pub codec: String,
    pub bandwidth: u32,
    pub time_stamp_frequency: u32,
    pub channels: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RtpSession {
    pub subsessions: Vec<RtpSubsession>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RtpConnection {
    pub readers: Vec<u32>,
    pub id: u32,
    pub ip: String,
    pub port: u16,
    pub tx_format: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RtspSession {
    pub prog_name: String,
    pub uri: String,
    pub id: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RtspConnection {
    pub id: u32,
    pub readers: Vec<u32>,
    pub name: String,
    pub tx_format: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterSpec {
    pub id: u32,
    #[serde(rename = "type")]
    pub filter_type: String,
    pub role: String,
    pub shared_frames: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PathSpec {
    pub id: u32,
    pub org_filter_id: u32,
    pub dst_filter_id: u32,
    pub org_writer_id: u32,
    pub dst_reader_id: u32,
    pub mid_filters_ids: Vec<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkerSpec {
    pub id: u32,
    #[serde(rename = "type")]
    pub worker_type: String,
}

/// Bare `{ "id": n }` payload (filter, path, worker or channel id)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Id {
    pub id: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Slaves {
    pub master: u32,
    pub slaves: Vec<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkerFilters {
    pub worker: u32,
    pub filters: Vec<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MasterVolume {
    pub volume: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChannelVolume {
    pub id: u32,
    pub volume: f64,
}

/// Geometry and visibility of one video mixer channel.
///
/// Also the shape the mixer reports channels in, so a channel taken from a
/// `getState` reply can be edited and sent back with
/// [`Event::update_video_channel`](crate::protocol::Event::update_video_channel).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelConfig {
    pub id: u32,
    pub width: f64,
    pub height: f64,
    pub x: f64,
    pub y: f64,
    pub layer: i32,
    pub opacity: f64,
    #[serde(default = "enabled_default")]
    pub enabled: bool,
}

fn enabled_default() -> bool {
    true
}

/// Optional resampler settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResamplerOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pixel_format: Option<String>,
    // Key name is what the mixer parses.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discart_period: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResamplerConfig {
    pub width: u32,
    pub height: u32,
    #[serde(flatten)]
    pub options: ResamplerOptions,
}

/// Optional video encoder settings. Unset fields are left untouched by the mixer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VideoEncoderOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fps: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gop: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bitrate: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub threads: Option<u32>,
    /// Only `true` is forwarded
    #[serde(default, skip_serializing_if = "is_false")]
    pub annexb: bool,
}

/// Optional audio encoder settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioEncoderOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channels: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sample_rate: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub codec: Option<String>,
}

fn is_false(value: &bool) -> bool {
    !*value
}

impl VideoEncoderOptions {
    pub fn with_fps(mut self, fps: u32) -> Self {
        self.fps = Some(fps);
        self
    }

    pub fn with_gop(mut self, gop: u32) -> Self {
        self.gop = Some(gop);
        self
    }

    pub fn with_bitrate(mut self, bitrate: u32) -> Self {
        self.bitrate = Some(bitrate);
        self
    }

    pub fn with_threads(mut self, threads: u32) -> Self {
        self.threads = Some(threads);
        self
    }

    pub fn with_annexb(mut self, annexb: bool) -> Self {
        self.annexb = annexb;
        self
    }
}

impl AudioEncoderOptions {
    pub fn with_channels(mut self, channels: u32) -> Self {
        self.channels = Some(channels);
        self
    }

    pub fn with_sample_rate(mut self, sample_rate: u32) -> Self {
        self.sample_rate = Some(sample_rate);
        self
    }

    pub fn with_codec(mut self, codec: impl Into<String>) -> Self {
        self.codec = Some(codec.into());
        self
    }
}

impl ResamplerOptions {
    pub fn with_pixel_format(mut self, pixel_format: impl Into<String>) -> Self {
        self.pixel_format = Some(pixel_format.into());
        self
    }

    pub fn with_discart_period(mut self, period: u32) -> Self {
        self.discart_period = Some(period);
        self
    }
}
