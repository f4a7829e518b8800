use crate::actions::{ActionInvoker, HttpDevice};
use crate::domain::device::{Device, SCHEMA_CONTEXT};
use crate::domain::host::Host;
use crate::http::diagnostics::Diagnostics;
use crate::http::invoker::Invoker;
use crate::http::transport::HttpTransport;
use crate::polling::{PollHandle, PropertyPoller};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};

/// Owns the configured devices and the polling tasks of their properties.
#[derive(Debug)]
pub struct HttpAdapter {
    devices: HashMap<String, HttpDevice>,
    pollers: Vec<PollHandle>,
}

impl HttpAdapter {
    /// Registers every device with the host and starts polling all properties.
    #[instrument(skip_all, fields(devices = devices.len()))]
    pub async fn start(devices: Vec<Device>, transport: Arc<dyn HttpTransport>, host: Arc<dyn Host>, diagnostics: Diagnostics) -> Self {
        let invoker = Arc::new(Invoker::new(transport, diagnostics));
        let action_invoker = ActionInvoker::new(invoker.clone());

        let mut http_devices = HashMap::new();
        let mut pollers = Vec::new();

        for device in without_shadowed(devices) {
            let device = Arc::new(device);
            info!(device_id = device.id.as_str(), context = SCHEMA_CONTEXT, "🔌 Adding device '{}'...", device.title);
            host.register_device(device.clone()).await;

            for property in &device.properties {
                let poller = PropertyPoller::new(device.id.clone(), property.clone(), invoker.clone(), host.clone());
                pollers.push(poller.spawn());
            }

            let http_device = HttpDevice::new(device.clone(), action_invoker.clone(), host.clone());
            #[rustfmt::skip]
            debug!(device_id = http_device.id(), "🔌 Actions of '{}': {:?}", device.title, http_device.action_names().collect::<Vec<_>>());
            http_devices.insert(http_device.id().to_string(), http_device);
        }

        info!("🔌 Started {} device(s) polling {} property(ies)", http_devices.len(), pollers.len());
        HttpAdapter {
            devices: http_devices,
            pollers,
        }
    }

    pub fn device(&self, device_id: &str) -> Option<&HttpDevice> {
        self.devices.get(device_id)
    }

    pub fn pollers(&self) -> &[PollHandle] {
        &self.pollers
    }

    /// Triggers an action on behalf of the host. Unknown devices are logged and ignored.
    pub async fn perform_action(&self, device_id: &str, action: &str) -> Option<JoinHandle<()>> {
        let Some(device) = self.device(device_id) else {
            warn!(device_id = device_id, "⚠️ Unknown device '{}', ignoring action '{}'", device_id, action);
            return None;
        };

        device.perform_action(action).await
    }

    /// Stops every polling task.
    pub fn stop(&self) {
        for poller in self.pollers() {
            debug!("🔌 Stopping poller of property '{}'", poller.property());
            poller.stop();
        }
        info!("🔌 Stopped polling {} property(ies)", self.pollers.len());
    }
}

/// Keeps the last device of every id, in load order.
fn without_shadowed(devices: Vec<Device>) -> Vec<Device> {
    let mut kept: Vec<Device> = Vec::with_capacity(devices.len());

    for device in devices {
        if let Some(index) = kept.iter().position(|d| d.id == device.id) {
            warn!(device_id = device.id.as_str(), "⚠️ Device '{}' is configured more than once, the last one wins", device.id);
            kept.remove(index);
        }
        kept.push(device);
    }
    kept
}
