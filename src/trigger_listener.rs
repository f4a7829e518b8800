use crate::adapter::HttpAdapter;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{info, instrument, warn};

/// Performs one action per line of input, formatted as `<device-id> <action-name>`, until EOF.
#[instrument(skip_all)]
pub async fn trigger_listener(adapter: Arc<HttpAdapter>, input: impl AsyncBufRead + Unpin) {
    let mut lines = input.lines();

    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                warn!("⚠️ Unable to read action trigger: {}", e);
                break;
            }
        };

        match parse_trigger(&line) {
            Some((device_id, action)) => {
                info!(device_id = device_id, "⚡ Triggering action '{}'", action);
                adapter.perform_action(device_id, action).await;
            }
            None if line.trim().is_empty() => {}
            None => warn!("⚠️ Ignoring malformed trigger '{}', expected '<device-id> <action-name>'", line),
        }
    }
}

fn parse_trigger(line: &str) -> Option<(&str, &str)> {
    let mut parts = line.split_whitespace();
    match (parts.next(), parts.next(), parts.next()) {
        (Some(device_id), Some(action), None) => Some((device_id, action)),
        _ => None,
    }
}
