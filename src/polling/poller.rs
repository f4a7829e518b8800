use crate::domain::device::{MAX_POLL_INTERVAL, MIN_POLL_INTERVAL, PropertyDescriptor};
use crate::domain::host::Host;
use crate::http::invoker::{InvokeError, Invoker};
use crate::polling::coercion::coerce;
use std::sync::Arc;
use tokio::task::{JoinHandle, JoinSet};
use tokio::time::{Instant, interval_at};
use tracing::{debug, instrument, warn};

/// Polls one property on a fixed period and publishes every coerced response to the host.
#[derive(Debug)]
pub struct PropertyPoller {
    device_id: String,
    descriptor: PropertyDescriptor,
    invoker: Arc<Invoker>,
    host: Arc<dyn Host>,
}

impl PropertyPoller {
    pub fn new(device_id: impl Into<String>, descriptor: PropertyDescriptor, invoker: Arc<Invoker>, host: Arc<dyn Host>) -> Self {
        PropertyPoller {
            device_id: device_id.into(),
            descriptor,
            invoker,
            host,
        }
    }

    /// Starts polling. The first request goes out one period from now.
    ///
    /// Ticks do not wait for each other: if a request is still in flight when the next period
    /// elapses, both run. Stopping the returned handle also cancels requests still in flight.
    pub fn spawn(self) -> PollHandle {
        let property = self.descriptor.name.clone();
        let period = self.descriptor.poll_interval.clamp(MIN_POLL_INTERVAL, MAX_POLL_INTERVAL);
        let poller = Arc::new(self);

        let handle: JoinHandle<()> = tokio::spawn(async move {
            let mut interval = interval_at(Instant::now() + period, period);
            let mut in_flight = JoinSet::new();

            loop {
                interval.tick().await;
                while in_flight.try_join_next().is_some() {}

                let poller = poller.clone();
                in_flight.spawn(async move { poller.poll_once().await });
            }
        });

        PollHandle { property, handle }
    }

    #[instrument(skip(self), fields(device_id = self.device_id.as_str(), property = self.descriptor.name.as_str()))]
    async fn poll_once(&self) {
        let response = match self.invoker.call(&self.descriptor.request).await {
            Ok(response) => response,
            Err(InvokeError::Build(e)) => {
                warn!("⚠️ Unable to build the request for property '{}': {}", self.descriptor.name, e);
                return;
            }
            Err(e) => {
                if self.invoker.diagnostics().verbose() {
                    warn!("⚠️ Polling property '{}' failed, keeping the previous value: {}", self.descriptor.name, e);
                }
                return;
            }
        };

        let value = coerce(&response.body, self.descriptor.value_type).unwrap_or_else(|anomaly| {
            warn!("⚠️ Unexpected value for property '{}': {}", self.descriptor.name, anomaly);
            anomaly.into_value()
        });

        debug!("🔄 Polled property '{}': {}", self.descriptor.name, value);
        self.host.publish_property_value(&self.device_id, &self.descriptor.name, value).await;
    }
}

#[derive(Debug)]
pub struct PollHandle {
    property: String,
    handle: JoinHandle<()>,
}

impl PollHandle {
    pub fn property(&self) -> &str {
        &self.property
    }

    pub fn stop(&self) {
        self.handle.abort();
    }

    pub fn is_stopped(&self) -> bool {
        self.handle.is_finished()
    }
}
