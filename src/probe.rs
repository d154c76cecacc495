//! Plain TCP reachability check run before any request is dispatched.
use std::time::Duration;

use reqwest::Url;
use tokio::net::TcpStream;
use tokio::time::{Instant, timeout};
use tracing::{info, warn};

use crate::domain::ConnectionProbe;

/// Opens (and immediately drops) a TCP connection to the URL's host and port.
///
/// A failed probe is reported, never raised: the run continues either way.
pub async fn probe_connection(url: &Url, limit: Duration) -> ConnectionProbe {
    let host = url
        .host_str()
        .map(|host| host.trim_start_matches('[').trim_end_matches(']').to_owned())
        .unwrap_or_default();
    let port = url.port_or_known_default().unwrap_or(0);
    info!("Probing TCP connection to {}:{}", host, port);

    if host.is_empty() || port == 0 {
        let probe = failed(host, port, None, format!("URL '{}' has no host/port", url));
        warn!("Connection probe skipped: {:?}", probe.error);
        return probe;
    }

    let start = Instant::now();
    let result = timeout(limit, TcpStream::connect((host.as_str(), port))).await;
    let elapsed = start.elapsed();
    let connect_ms = Some(u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX));

    let probe = match result {
        Ok(Ok(stream)) => {
            drop(stream);
            ConnectionProbe {
                success: true,
                host,
                port,
                connect_ms,
                error: None,
            }
        }
        Ok(Err(err)) => failed(host, port, connect_ms, format!("TCP connect failed: {}", err)),
        Err(_) => failed(
            host,
            port,
            connect_ms,
            format!("TCP connect timed out after {:.2}s", limit.as_secs_f64()),
        ),
    };

    if probe.success {
        info!(
            "TCP connection established in {:.2}s",
            elapsed.as_secs_f64()
        );
    } else {
        warn!(
            "Connection probe failed, continuing anyway: {}",
            probe.error.as_deref().unwrap_or("unknown error")
        );
    }
    probe
}

const fn failed(
    host: String,
    port: u16,
    connect_ms: Option<u64>,
    error: String,
) -> ConnectionProbe {
    ConnectionProbe {
        success: false,
        host,
        port,
        connect_ms,
        error: Some(error),
    }
}
