//! REST client for the UltraGrid control GUI
//!
//! All endpoints live under `http://{host}/ultragrid/gui/`. Requests that
//! never reach UltraGrid (host down, port in use, error status) are logged
//! and reported as `false` / `None`; a reply that is not valid JSON is an
//! error.

use bytes::Bytes;
use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::config::UltraGridConfig;
use crate::constants::{DEFAULT_ULTRAGRID_HOST, ULTRAGRID_GUI_PATH};
use crate::error::UltraGridError;

/// Reply of `check`
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
pub struct CheckReply {
    /// The command is valid on the far-end machine
    #[serde(default, deserialize_with = "truthy")]
    pub checked_local: bool,
    #[serde(default, deserialize_with = "truthy")]
    pub uv_running: bool,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub(crate) struct RunReply {
    #[serde(default, deserialize_with = "truthy")]
    pub uv_running: bool,
}

#[derive(Debug, Deserialize)]
struct ConfigReply {
    #[serde(default, deserialize_with = "truthy")]
    result: bool,
    #[serde(default)]
    curr_stream_config: Option<Value>,
}

/// UltraGrid flags are loosely typed: `null` and `false` are false, any
/// other value is true.
fn is_truthy(value: &Value) -> bool {
    !matches!(value, Value::Null | Value::Bool(false))
}

fn truthy<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    Value::deserialize(deserializer).map(|value| is_truthy(&value))
}

#[derive(Debug, Clone)]
pub struct UltraGridClient {
    http: reqwest::Client,
    host: String,
}

impl UltraGridClient {
    /// Client for the UltraGrid GUI at `host` (`ip` or `ip:port`).
    /// An empty host means the local machine.
    pub fn new(host: impl Into<String>, config: &UltraGridConfig) -> Result<Self, UltraGridError> {
        let host = host.into();
        let host = if host.is_empty() {
            DEFAULT_ULTRAGRID_HOST.to_string()
        } else {
            host
        };

        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()?;

        Ok(Self { http, host })
    }

    pub fn from_config(config: &UltraGridConfig) -> Result<Self, UltraGridError> {
        Self::new(config.host.clone(), config)
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    fn url(&self, endpoint: &str) -> String {
        format!("http://{}{}/{}", self.host, ULTRAGRID_GUI_PATH, endpoint)
    }

    /// Ask UltraGrid whether `cmd` can run on its machine
    pub async fn check(&self, cmd: &str) -> Result<Option<CheckReply>, UltraGridError> {
        let request = self
            .http
            .post(self.url("check"))
            .form(&[("mode", "local"), ("cmd", cmd)]);
        self.call("check", request).await
    }

    /// Start UltraGrid with `cmd`. `true` once it reports running.
    pub async fn run(&self, cmd: &str) -> Result<bool, UltraGridError> {
        Ok(self
            .run_reply(cmd)
            .await?
            .map(|reply| reply.uv_running)
            .unwrap_or(false))
    }

    pub(crate) async fn run_reply(&self, cmd: &str) -> Result<Option<RunReply>, UltraGridError> {
        info!("Running UltraGrid with: {}", cmd);
        let request = self.http.post(self.url("run_uv_cmd")).form(&[("cmd", cmd)]);
        let reply: Option<RunReply> = self.call("run_uv_cmd", request).await?;
        if matches!(reply, Some(RunReply { uv_running: true })) {
            info!("UltraGrid at {} is running", self.host);
        }
        Ok(reply)
    }

    /// `true` when the request went through; the reply body is not inspected
    pub async fn set_control_port(&self, port: u16) -> bool {
        info!("Setting UltraGrid control port {} on {}", port, self.host);
        let port = port.to_string();
        let request = self
            .http
            .post(self.url("set_controlport"))
            .form(&[("port", port.as_str())]);
        self.send(request).await.is_some()
    }

    /// Current stream parameters, or `None` when UltraGrid is not running
    pub async fn stream_params(&self) -> Result<Option<Value>, UltraGridError> {
        info!("Getting UltraGrid channel params from {}", self.host);
        let request = self.http.get(self.url("state"));
        let reply: Option<Value> = self.call("state", request).await?;

        Ok(reply.filter(|state| {
            state.get("uv_running").map(is_truthy).unwrap_or(false)
        }))
    }

    /// Switch video bitrate congestion control mode. Returns the resulting
    /// stream configuration when UltraGrid accepted it.
    pub async fn set_vbcc(&self, mode: &str) -> Result<Option<Value>, UltraGridError> {
        info!("Setting vbcc {} on {}", mode, self.host);
        let request = self.http.post(self.url("set_vbcc")).form(&[("mode", mode)]);
        self.configure("set_vbcc", request).await
    }

    /// Change the transmitted frame size
    pub async fn set_size(&self, size: &str) -> Result<Option<Value>, UltraGridError> {
        info!("Setting size {} on {}", size, self.host);
        let request = self.http.post(self.url("set_size")).form(&[("value", size)]);
        self.configure("set_size", request).await
    }

    async fn configure(
        &self,
        endpoint: &str,
        request: RequestBuilder,
    ) -> Result<Option<Value>, UltraGridError> {
        let reply: Option<ConfigReply> = self.call(endpoint, request).await?;
        Ok(reply
            .filter(|reply| reply.result)
            .and_then(|reply| reply.curr_stream_config))
    }

    async fn call<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        request: RequestBuilder,
    ) -> Result<Option<T>, UltraGridError> {
        let Some(body) = self.send(request).await else {
            return Ok(None);
        };
        debug!("{} replied: {}", endpoint, String::from_utf8_lossy(&body));

        serde_json::from_slice(&body)
            .map(Some)
            .map_err(|source| UltraGridError::InvalidReply {
                endpoint: endpoint.to_string(),
                source,
            })
    }

    async fn send(&self, request: RequestBuilder) -> Option<Bytes> {
        let result = async {
            request
                .send()
                .await?
                .error_for_status()?
                .bytes()
                .await
        }
        .await;

        match result {
            Ok(body) => Some(body),
            Err(e) => {
                warn!(
                    "No connection to UltraGrid at {} or selected port in use ({}). Please check far-end UltraGrid.",
                    self.host, e
                );
                None
            }
        }
    }
}
