//! Command-line front end for the mixer and UltraGrid clients
//!
//! ```text
//! rmixer state
//! rmixer reset | stop
//! rmixer send <request.json>
//! rmixer uv-probe <host> <port> <control-port>
//! rmixer uv-state <host>
//! rmixer uv-vbcc <host> <mode>
//! rmixer uv-size <host> <size>
//! rmixer uv-control-port <host> <port>
//! ```

use anyhow::{bail, Context, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use rmixer::{
    config::AppConfig,
    protocol::{Event, Request},
    ultragrid::{self, UltraGridClient},
    Connector,
};

const USAGE: &str = "usage: rmixer <state|reset|stop|send FILE|uv-probe HOST PORT CPORT|uv-state HOST|uv-vbcc HOST MODE|uv-size HOST SIZE|uv-control-port HOST PORT>";

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::load()?;
    let args: Vec<String> = std::env::args().skip(1).collect();
    let arg = |i: usize| arg_at(&args, i);

    let mut connector = Connector::from_config(&config.mixer);

    match arg(0)? {
        "state" => print_json(&connector.send_request(Event::get_state()).await?),
        "reset" => print_json(&connector.send_request(Event::reset()).await?),
        "stop" => print_json(&connector.send_request(Event::stop()).await?),
        "send" => {
            let path = arg(1)?;
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path))?;
            let request: Request =
                serde_json::from_str(&text).with_context(|| format!("parsing {}", path))?;
            print_json(&connector.send_request(request).await?);
        }
        "uv-probe" => {
            let port = arg(2)?.parse().context("invalid port")?;
            let control_port = arg(3)?.parse().context("invalid control port")?;
            let running =
                ultragrid::check_and_transmit(arg(1)?, port, control_port, &config.ultragrid)
                    .await?;
            println!("{}", if running { "running" } else { "not running" });
        }
        "uv-state" => {
            let client = UltraGridClient::new(arg(1)?, &config.ultragrid)?;
            print_optional(client.stream_params().await?);
        }
        "uv-vbcc" => {
            let client = UltraGridClient::new(arg(1)?, &config.ultragrid)?;
            print_optional(client.set_vbcc(arg(2)?).await?);
        }
        "uv-size" => {
            let client = UltraGridClient::new(arg(1)?, &config.ultragrid)?;
            print_optional(client.set_size(arg(2)?).await?);
        }
        "uv-control-port" => {
            let client = UltraGridClient::new(arg(1)?, &config.ultragrid)?;
            let port = arg(2)?.parse().context("invalid port")?;
            if !client.set_control_port(port).await {
                bail!("could not reach UltraGrid at {}", client.host());
            }
        }
        other => bail!("unknown command '{}'\n{}", other, USAGE),
    }

    Ok(())
}

fn arg_at(args: &[String], i: usize) -> Result<&str> {
    args.get(i)
        .map(String::as_str)
        .with_context(|| USAGE.to_string())
}

fn print_json(value: &serde_json::Value) {
    match serde_json::to_string_pretty(value) {
        Ok(text) => println!("{}", text),
        Err(_) => println!("{}", value),
    }
}

fn print_optional(value: Option<serde_json::Value>) {
    match value {
        Some(value) => print_json(&value),
        None => println!("{{}}"),
    }
}
