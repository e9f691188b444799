//! Discovery of a working UltraGrid transmission setup
//!
//! Capture sources are tried best first: DeckLink full HD, DeckLink HD,
//! V4L2 webcam, then the test card at two resolutions. The first command
//! UltraGrid accepts and manages to start wins.

use std::net::IpAddr;

use tokio::net::UdpSocket;
use tracing::{info, warn};

use crate::config::UltraGridConfig;
use crate::error::UltraGridError;

use super::client::UltraGridClient;

/// Transmission commands in order of preference
pub const UV_CMD_PRIORITY_LIST: [&str; 5] = [
    "uv -t decklink:0:8 -c libavcodec:codec=H.264 --rtsp-server",
    "uv -t decklink:0:9 -c libavcodec:codec=H.264 --rtsp-server",
    "uv -t v4l2:fmt=YUYV:size=640x480 -c libavcodec:codec=H.264 --rtsp-server",
    "uv -t testcard:1920:1080:20:UYVY -c libavcodec:codec=H.264 --rtsp-server",
    "uv -t testcard:640:480:15:UYVY -c libavcodec:codec=H.264 --rtsp-server",
];

/// Command used to see whether UltraGrid answers at all
pub const AVAILABILITY_CHECK_CMD: &str = "uv -t testcard:640:480:15:UYVY -c libavcodec:codec=H.264";

/// Full command line sending to the mixer at `mixer_ip:port`
pub fn transmit_command(base: &str, control_port: u16, mixer_ip: IpAddr, port: u16) -> String {
    format!(
        "{} --control-port {} {} -P{}",
        base, control_port, mixer_ip, port
    )
}

/// Address of the local interface that routes towards `probe_target`.
///
/// Connecting a UDP socket only selects a route; no packet is sent.
pub async fn local_ip(probe_target: &str) -> Result<IpAddr, UltraGridError> {
    let socket = UdpSocket::bind("0.0.0.0:0")
        .await
        .map_err(UltraGridError::LocalAddress)?;
    socket
        .connect(probe_target)
        .await
        .map_err(UltraGridError::LocalAddress)?;
    let addr = socket.local_addr().map_err(UltraGridError::LocalAddress)?;
    Ok(addr.ip())
}

impl UltraGridClient {
    /// Find a command UltraGrid can run that transmits to `mixer_ip:port`,
    /// with its control interface on `control_port`, and start it.
    ///
    /// Returns whether UltraGrid ended up running. An unreachable UltraGrid
    /// gives `false`.
    pub async fn check_and_transmit(
        &self,
        mixer_ip: IpAddr,
        port: u16,
        control_port: u16,
    ) -> Result<bool, UltraGridError> {
        info!(
            "Trying to set up and transmit from {} to {} on mixer port {}",
            self.host(),
            mixer_ip,
            port
        );

        let availability = format!("{} -P{}", AVAILABILITY_CHECK_CMD, port);
        if self.check(&availability).await?.is_none() {
            return Ok(false);
        }

        let mut running = false;
        for base in UV_CMD_PRIORITY_LIST {
            let cmd = transmit_command(base, control_port, mixer_ip, port);
            info!("Checking: {}", cmd);

            let Some(reply) = self.check(&cmd).await? else {
                return Ok(false);
            };
            running = reply.uv_running;

            if !reply.checked_local {
                continue;
            }

            if let Some(run) = self.run_reply(&cmd).await? {
                running = run.uv_running;
                if running {
                    break;
                }
            }
        }

        if !running {
            warn!("No transmission setup could be started on {}", self.host());
        }
        Ok(running)
    }
}

/// Probe the UltraGrid at `host`, sending to this machine's outward-facing
/// address.
pub async fn check_and_transmit(
    host: &str,
    port: u16,
    control_port: u16,
    config: &UltraGridConfig,
) -> Result<bool, UltraGridError> {
    let client = UltraGridClient::new(host, config)?;
    let mixer_ip = local_ip(&config.probe_target).await?;
    client.check_and_transmit(mixer_ip, port, control_port).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;

    #[test]
    fn test_transmit_command() {
        let cmd = transmit_command(
            UV_CMD_PRIORITY_LIST[0],
            5054,
            IpAddr::V4(Ipv4Addr::new(192, 168, 10, 4)),
            5004,
        );
        assert_eq!(
            cmd,
            "uv -t decklink:0:8 -c libavcodec:codec=H.264 --rtsp-server --control-port 5054 192.168.10.4 -P5004"
        );
    }

    #[tokio::test]
    async fn test_local_ip_towards_loopback() {
        let ip = local_ip("127.0.0.1:1").await.unwrap();
        assert!(ip.is_loopback());
    }
}
