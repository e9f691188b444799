//! Mixer events and requests
//!
//! An [`Event`] is one command for the mixer. Events travel inside a
//! [`Request`], which is what actually goes over the wire:
//!
//! ```text
//! {"events":[{"action":"createFilter","params":{...}},
//!            {"action":"configure","params":{...},"filterId":3,"delay":500}]}
//! ```

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use super::params::*;

/// Every action the client knows how to build, with its typed parameters
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "action", content = "params")]
pub enum Action {
    #[serde(rename = "reset")]
    Reset(NoParams),
    #[serde(rename = "stop")]
    Stop(NoParams),
    #[serde(rename = "getState")]
    GetState(NoParams),
    #[serde(rename = "addSession")]
    AddRtpSession(RtpSession),
    #[serde(rename = "addSession")]
    AddRtspSession(RtspSession),
    #[serde(rename = "addRTPConnection")]
    AddRtpConnection(RtpConnection),
    #[serde(rename = "addRTSPConnection")]
    AddRtspConnection(RtspConnection),
    #[serde(rename = "createFilter")]
    CreateFilter(FilterSpec),
    #[serde(rename = "removeFilter")]
    RemoveFilter(Id),
    #[serde(rename = "createPath")]
    CreatePath(PathSpec),
    #[serde(rename = "removePath")]
    RemovePath(Id),
    #[serde(rename = "addWorker")]
    AddWorker(WorkerSpec),
    #[serde(rename = "removeWorker")]
    RemoveWorker(Id),
    #[serde(rename = "addSlavesToFilter")]
    AddSlavesToFilter(Slaves),
    #[serde(rename = "addFiltersToWorker")]
    AddFiltersToWorker(WorkerFilters),
    #[serde(rename = "muteMaster")]
    MuteMaster(NoParams),
    #[serde(rename = "muteChannel")]
    MuteChannel(Id),
    #[serde(rename = "soloChannel")]
    SoloChannel(Id),
    #[serde(rename = "changeMasterVolume")]
    ChangeMasterVolume(MasterVolume),
    #[serde(rename = "changeChannelVolume")]
    ChangeChannelVolume(ChannelVolume),
    #[serde(rename = "configChannel")]
    ConfigChannel(ChannelConfig),
    #[serde(rename = "configure")]
    ConfigureResampler(ResamplerConfig),
    #[serde(rename = "configure")]
    ConfigureVideoEncoder(VideoEncoderOptions),
    #[serde(rename = "configure")]
    ConfigureAudioEncoder(AudioEncoderOptions),
}

impl Action {
    /// Wire name of the action
    pub fn name(&self) -> &'static str {
        match self {
            Action::Reset(_) => "reset",
            Action::Stop(_) => "stop",
            Action::GetState(_) => "getState",
            Action::AddRtpSession(_) | Action::AddRtspSession(_) => "addSession",
            Action::AddRtpConnection(_) => "addRTPConnection",
            Action::AddRtspConnection(_) => "addRTSPConnection",
            Action::CreateFilter(_) => "createFilter",
            Action::RemoveFilter(_) => "removeFilter",
            Action::CreatePath(_) => "createPath",
            Action::RemovePath(_) => "removePath",
            Action::AddWorker(_) => "addWorker",
            Action::RemoveWorker(_) => "removeWorker",
            Action::AddSlavesToFilter(_) => "addSlavesToFilter",
            Action::AddFiltersToWorker(_) => "addFiltersToWorker",
            Action::MuteMaster(_) => "muteMaster",
            Action::MuteChannel(_) => "muteChannel",
            Action::SoloChannel(_) => "soloChannel",
            Action::ChangeMasterVolume(_) => "changeMasterVolume",
            Action::ChangeChannelVolume(_) => "changeChannelVolume",
            Action::ConfigChannel(_) => "configChannel",
            Action::ConfigureResampler(_)
            | Action::ConfigureVideoEncoder(_)
            | Action::ConfigureAudioEncoder(_) => "configure",
        }
    }
}

/// Action plus parameters, either typed or free-form
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum EventBody {
    Typed(Action),
    Custom {
        action: String,
        params: Map<String, Value>,
    },
}

/// A single mixer command
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Event {
    #[serde(flatten)]
    body: EventBody,
    #[serde(rename = "filterId", skip_serializing_if = "Option::is_none")]
    filter_id: Option<u32>,
    /// Set when the event is queued, in milliseconds
    #[serde(skip_serializing_if = "Option::is_none")]
    delay: Option<u64>,
}

impl Event {
    /// Build an event targeting `filter_id`. Id `0` means "no target".
    pub fn new(action: Action, filter_id: u32) -> Self {
        Self {
            body: EventBody::Typed(action),
            filter_id: (filter_id != 0).then_some(filter_id),
            delay: None,
        }
    }

    /// Free-form event for actions without a dedicated builder
    pub fn create(action: impl Into<String>, params: Map<String, Value>, filter_id: u32) -> Self {
        Self {
            body: EventBody::Custom {
                action: action.into(),
                params,
            },
            filter_id: (filter_id != 0).then_some(filter_id),
            delay: None,
        }
    }

    fn global(action: Action) -> Self {
        Self::new(action, 0)
    }

    pub fn action(&self) -> &str {
        match &self.body {
            EventBody::Typed(action) => action.name(),
            EventBody::Custom { action, .. } => action,
        }
    }

    pub fn body(&self) -> &EventBody {
        &self.body
    }

    pub fn filter_id(&self) -> Option<u32> {
        self.filter_id
    }

    pub fn delay(&self) -> Option<u64> {
        self.delay
    }

    pub fn with_delay(mut self, delay: u64) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn reset() -> Self {
        Self::global(Action::Reset(NoParams {}))
    }

    pub fn stop() -> Self {
        Self::global(Action::Stop(NoParams {}))
    }

    pub fn get_state() -> Self {
        Self::global(Action::GetState(NoParams {}))
    }

    /// Add an RTP session with a single subsession to a receiver filter
    pub fn add_rtp_session(
        filter_id: u32,
        port: u16,
        medium: impl Into<String>,
        codec: impl Into<String>,
        bandwidth: u32,
        time_stamp_frequency: u32,
        channels: u32,
    ) -> Self {
        let subsession = RtpSubsession {
            port,
            medium: medium.into(),
            codec: codec.into(),
            bandwidth,
            time_stamp_frequency,
            channels,
        };
        Self::new(
            Action::AddRtpSession(RtpSession {
                subsessions: vec![subsession],
            }),
            filter_id,
        )
    }

    pub fn add_output_rtp_tx(
        filter_id: u32,
        readers: Vec<u32>,
        session_id: u32,
        ip: impl Into<String>,
        port: u16,
        tx_format: impl Into<String>,
    ) -> Self {
        Self::new(
            Action::AddRtpConnection(RtpConnection {
                readers,
                id: session_id,
                ip: ip.into(),
                port,
                tx_format: tx_format.into(),
            }),
            filter_id,
        )
    }

    pub fn add_rtsp_session(
        filter_id: u32,
        prog_name: impl Into<String>,
        uri: impl Into<String>,
        id: u32,
    ) -> Self {
        Self::new(
            Action::AddRtspSession(RtspSession {
                prog_name: prog_name.into(),
                uri: uri.into(),
                id,
            }),
            filter_id,
        )
    }

    pub fn add_rtsp_output_session(
        tx_id: u32,
        session_id: u32,
        readers: Vec<u32>,
        name: impl Into<String>,
        tx_format: impl Into<String>,
    ) -> Self {
        Self::new(
            Action::AddRtspConnection(RtspConnection {
                id: session_id,
                readers,
                name: name.into(),
                tx_format: tx_format.into(),
            }),
            tx_id,
        )
    }

    pub fn create_filter(
        id: u32,
        filter_type: impl Into<String>,
        role: impl Into<String>,
        shared_frames: bool,
    ) -> Self {
        Self::global(Action::CreateFilter(FilterSpec {
            id,
            filter_type: filter_type.into(),
            role: role.into(),
            shared_frames,
        }))
    }

    pub fn remove_filter(id: u32) -> Self {
        Self::global(Action::RemoveFilter(Id { id }))
    }

    pub fn create_path(
        id: u32,
        org_filter_id: u32,
        dst_filter_id: u32,
        org_writer_id: u32,
        dst_reader_id: u32,
        mid_filters_ids: Vec<u32>,
    ) -> Self {
        Self::global(Action::CreatePath(PathSpec {
            id,
            org_filter_id,
            dst_filter_id,
            org_writer_id,
            dst_reader_id,
            mid_filters_ids,
        }))
    }

    pub fn remove_path(id: u32) -> Self {
        Self::global(Action::RemovePath(Id { id }))
    }

    pub fn add_worker(id: u32, worker_type: impl Into<String>) -> Self {
        Self::global(Action::AddWorker(WorkerSpec {
            id,
            worker_type: worker_type.into(),
        }))
    }

    pub fn remove_worker(id: u32) -> Self {
        Self::global(Action::RemoveWorker(Id { id }))
    }

    pub fn add_slaves_to_filter(master: u32, slaves: Vec<u32>) -> Self {
        Self::global(Action::AddSlavesToFilter(Slaves { master, slaves }))
    }

    pub fn add_filters_to_worker(worker: u32, filters: Vec<u32>) -> Self {
        Self::global(Action::AddFiltersToWorker(WorkerFilters { worker, filters }))
    }

    // Audio mixer

    pub fn mute_master(filter_id: u32) -> Self {
        Self::new(Action::MuteMaster(NoParams {}), filter_id)
    }

    pub fn mute_channel(filter_id: u32, id: u32) -> Self {
        Self::new(Action::MuteChannel(Id { id }), filter_id)
    }

    pub fn solo_channel(filter_id: u32, id: u32) -> Self {
        Self::new(Action::SoloChannel(Id { id }), filter_id)
    }

    pub fn change_master_volume(filter_id: u32, volume: f64) -> Self {
        Self::new(Action::ChangeMasterVolume(MasterVolume { volume }), filter_id)
    }

    pub fn change_channel_volume(filter_id: u32, id: u32, volume: f64) -> Self {
        Self::new(
            Action::ChangeChannelVolume(ChannelVolume { id, volume }),
            filter_id,
        )
    }

    // Video mixer

    #[allow(clippy::too_many_arguments)]
    pub fn set_position_size(
        mixer_id: u32,
        id: u32,
        width: f64,
        height: f64,
        x: f64,
        y: f64,
        layer: i32,
        opacity: f64,
        enabled: bool,
    ) -> Self {
        Self::update_video_channel(
            mixer_id,
            ChannelConfig {
                id,
                width,
                height,
                x,
                y,
                layer,
                opacity,
                enabled,
            },
        )
    }

    pub fn update_video_channel(mixer_id: u32, channel: ChannelConfig) -> Self {
        Self::new(Action::ConfigChannel(channel), mixer_id)
    }

    pub fn configure_resampler(
        resampler_id: u32,
        width: u32,
        height: u32,
        options: ResamplerOptions,
    ) -> Self {
        Self::new(
            Action::ConfigureResampler(ResamplerConfig {
                width,
                height,
                options,
            }),
            resampler_id,
        )
    }

    pub fn configure_video_encoder(encoder_id: u32, options: VideoEncoderOptions) -> Self {
        Self::new(Action::ConfigureVideoEncoder(options), encoder_id)
    }

    pub fn configure_audio_encoder(encoder_id: u32, options: AudioEncoderOptions) -> Self {
        Self::new(Action::ConfigureAudioEncoder(options), encoder_id)
    }
}

/// Events read back from JSON (a request file, a captured request) are kept
/// free-form since several actions share a wire name.
impl<'de> Deserialize<'de> for Event {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        struct RawEvent {
            action: String,
            #[serde(default)]
            params: Map<String, Value>,
            #[serde(rename = "filterId", default)]
            filter_id: Option<u32>,
            #[serde(default)]
            delay: Option<u64>,
        }

        let raw = RawEvent::deserialize(deserializer)?;
        let mut event = Event::create(raw.action, raw.params, raw.filter_id.unwrap_or(0));
        event.delay = raw.delay;
        Ok(event)
    }
}

/// Wire envelope: `{"events": [...]}`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Request {
    pub events: Vec<Event>,
}

impl Request {
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }
}

impl From<Event> for Request {
    fn from(event: Event) -> Self {
        Self {
            events: vec![event],
        }
    }
}

impl From<Vec<Event>> for Request {
    fn from(events: Vec<Event>) -> Self {
        Self { events }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn wire(event: &Event) -> Value {
        serde_json::to_value(event).unwrap()
    }

    #[test]
    fn test_global_event_has_empty_params_and_no_filter() {
        assert_eq!(wire(&Event::reset()), json!({"action": "reset", "params": {}}));
        assert_eq!(wire(&Event::get_state()), json!({"action": "getState", "params": {}}));
    }

    #[test]
    fn test_zero_filter_id_is_omitted() {
        let event = Event::mute_master(0);
        assert_eq!(event.filter_id(), None);
        assert_eq!(wire(&event), json!({"action": "muteMaster", "params": {}}));
    }

    #[test]
    fn test_rtp_session() {
        let event = Event::add_rtp_session(2, 5004, "video", "H264", 5000, 90000, 0);
        assert_eq!(
            wire(&event),
            json!({
                "action": "addSession",
                "params": {
                    "subsessions": [{
                        "port": 5004,
                        "medium": "video",
                        "codec": "H264",
                        "bandwidth": 5000,
                        "timeStampFrequency": 90000,
                        "channels": 0
                    }]
                },
                "filterId": 2
            })
        );
    }

    #[test]
    fn test_rtsp_session_shares_action_name() {
        let event = Event::add_rtsp_session(4, "testsrc", "rtsp://10.0.0.2:8554/cam", 1);
        assert_eq!(event.action(), "addSession");
        assert_eq!(
            wire(&event)["params"],
            json!({"progName": "testsrc", "uri": "rtsp://10.0.0.2:8554/cam", "id": 1})
        );
    }

    #[test]
    fn test_create_filter_and_path() {
        assert_eq!(
            wire(&Event::create_filter(7, "videoMixer", "master", true)),
            json!({
                "action": "createFilter",
                "params": {"id": 7, "type": "videoMixer", "role": "master", "sharedFrames": true}
            })
        );

        assert_eq!(
            wire(&Event::create_path(1, 2, 3, 0, 1, vec![4, 5]))["params"],
            json!({
                "id": 1,
                "orgFilterId": 2,
                "dstFilterId": 3,
                "orgWriterId": 0,
                "dstReaderId": 1,
                "midFiltersIds": [4, 5]
            })
        );
    }

    #[test]
    fn test_output_connections() {
        assert_eq!(
            wire(&Event::add_output_rtp_tx(9, vec![1, 2], 3, "10.0.0.9", 6000, "std")),
            json!({
                "action": "addRTPConnection",
                "params": {"readers": [1, 2], "id": 3, "ip": "10.0.0.9", "port": 6000, "txFormat": "std"},
                "filterId": 9
            })
        );
        assert_eq!(
            wire(&Event::add_rtsp_output_session(9, 4, vec![1], "plainrtp", "std"))["params"],
            json!({"id": 4, "readers": [1], "name": "plainrtp", "txFormat": "std"})
        );
    }

    #[test]
    fn test_audio_events() {
        assert_eq!(
            wire(&Event::change_channel_volume(3, 2, 0.5)),
            json!({"action": "changeChannelVolume", "params": {"id": 2, "volume": 0.5}, "filterId": 3})
        );
        assert_eq!(wire(&Event::solo_channel(3, 1))["params"], json!({"id": 1}));
    }

    #[test]
    fn test_position_size_matches_update_video_channel() {
        let by_fields = Event::set_position_size(5, 1, 0.5, 0.5, 0.0, 0.25, 2, 1.0, true);
        let channel: ChannelConfig = serde_json::from_value(json!({
            "id": 1, "width": 0.5, "height": 0.5, "x": 0, "y": 0.25, "layer": 2, "opacity": 1
        }))
        .unwrap();
        let by_channel = Event::update_video_channel(5, channel);

        assert_eq!(by_fields, by_channel);
        assert_eq!(wire(&by_fields)["action"], "configChannel");
        assert_eq!(wire(&by_fields)["params"]["enabled"], true);
    }

    #[test]
    fn test_graph_and_channel_builders() {
        let cases = [
            (Event::remove_path(3), json!({"action": "removePath", "params": {"id": 3}})),
            (
                Event::add_worker(2, "livemedia"),
                json!({"action": "addWorker", "params": {"id": 2, "type": "livemedia"}}),
            ),
            (Event::remove_worker(2), json!({"action": "removeWorker", "params": {"id": 2}})),
            (
                Event::add_slaves_to_filter(1, vec![5, 6]),
                json!({"action": "addSlavesToFilter", "params": {"master": 1, "slaves": [5, 6]}}),
            ),
            (
                Event::add_filters_to_worker(2, vec![1, 3]),
                json!({"action": "addFiltersToWorker", "params": {"worker": 2, "filters": [1, 3]}}),
            ),
            (
                Event::mute_channel(4, 1),
                json!({"action": "muteChannel", "params": {"id": 1}, "filterId": 4}),
            ),
            (
                Event::configure_resampler(
                    6,
                    640,
                    360,
                    ResamplerOptions::default().with_discart_period(2),
                ),
                json!({
                    "action": "configure",
                    "params": {"width": 640, "height": 360, "discartPeriod": 2},
                    "filterId": 6
                }),
            ),
        ];

        for (event, expected) in cases {
            assert_eq!(wire(&event), expected, "{}", event.action());
        }
    }

    #[test]
    fn test_configure_only_sends_set_options() {
        let resampler = Event::configure_resampler(
            6,
            1280,
            720,
            ResamplerOptions::default().with_pixel_format("YUV420P"),
        );
        assert_eq!(
            wire(&resampler)["params"],
            json!({"width": 1280, "height": 720, "pixelFormat": "YUV420P"})
        );

        let encoder = Event::configure_video_encoder(
            8,
            VideoEncoderOptions::default().with_fps(25).with_annexb(false),
        );
        assert_eq!(wire(&encoder)["params"], json!({"fps": 25}));

        let encoder = Event::configure_video_encoder(8, VideoEncoderOptions::default().with_annexb(true));
        assert_eq!(wire(&encoder)["params"], json!({"annexb": true}));

        let audio = Event::configure_audio_encoder(
            10,
            AudioEncoderOptions::default().with_sample_rate(48000).with_codec("opus"),
        );
        assert_eq!(
            wire(&audio),
            json!({"action": "configure", "params": {"sampleRate": 48000, "codec": "opus"}, "filterId": 10})
        );
    }

    #[test]
    fn test_custom_event_and_delay() {
        let mut params = Map::new();
        params.insert("id".to_string(), json!(3));
        let event = Event::create("removeFilter", params, 0).with_delay(250);

        assert_eq!(
            wire(&event),
            json!({"action": "removeFilter", "params": {"id": 3}, "delay": 250})
        );
    }

    #[test]
    fn test_parse_request_document() {
        let request: Request = serde_json::from_value(json!({
            "events": [
                {"action": "stop"},
                {"action": "muteChannel", "params": {"id": 1}, "filterId": 4, "delay": 100}
            ]
        }))
        .unwrap();

        assert_eq!(request.len(), 2);
        assert_eq!(request.events[0].action(), "stop");
        assert_eq!(wire(&request.events[0]), json!({"action": "stop", "params": {}}));
        assert_eq!(request.events[1].filter_id(), Some(4));
        assert_eq!(request.events[1].delay(), Some(100));
    }

    #[test]
    fn test_single_event_is_wrapped() {
        let request = Request::from(Event::stop());
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({"events": [{"action": "stop", "params": {}}]})
        );
    }
}
