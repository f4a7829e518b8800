use crate::actions::action_invoker::ActionInvoker;
use crate::domain::device::Device;
use crate::domain::host::Host;
use futures::FutureExt;
use futures::future::BoxFuture;
use std::collections::BTreeMap;
use std::fmt::{Debug, Formatter};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{instrument, warn};

pub type ActionCallback = Arc<dyn Fn() -> BoxFuture<'static, ()> + Send + Sync>;

/// A configured device with its action callbacks, fixed at construction.
pub struct HttpDevice {
    device: Arc<Device>,
    callbacks: BTreeMap<String, ActionCallback>,
    host: Arc<dyn Host>,
}

impl HttpDevice {
    pub fn new(device: Arc<Device>, invoker: ActionInvoker, host: Arc<dyn Host>) -> Self {
        let mut callbacks: BTreeMap<String, ActionCallback> = BTreeMap::new();

        for action in &device.actions {
            let name = action.name.clone();
            let action = Arc::new(action.clone());
            let device_id = device.id.clone();
            let invoker = invoker.clone();

            let callback: ActionCallback = Arc::new(move || {
                let action = action.clone();
                let device_id = device_id.clone();
                let invoker = invoker.clone();
                async move { invoker.invoke(&device_id, &action).await }.boxed()
            });
            callbacks.insert(name, callback);
        }

        HttpDevice { device, callbacks, host }
    }

    pub fn id(&self) -> &str {
        &self.device.id
    }

    pub fn action_names(&self) -> impl Iterator<Item = &str> {
        self.callbacks.keys().map(String::as_str)
    }

    /// Runs the action in the background and returns its handle, or `None` if the name is unknown.
    ///
    /// The host sees the action start and finish either way. Finishing does not wait for the
    /// HTTP call.
    #[instrument(skip(self), fields(device_id = self.device.id.as_str()))]
    pub async fn perform_action(&self, name: &str) -> Option<JoinHandle<()>> {
        self.host.action_started(&self.device.id, name).await;

        let invocation = match self.callbacks.get(name) {
            Some(callback) => Some(tokio::spawn(callback())),
            None => {
                warn!("⚠️ Unknown action '{}' for device '{}'", name, self.device.title);
                None
            }
        };

        self.host.action_finished(&self.device.id, name).await;
        invocation
    }
}

impl Debug for HttpDevice {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpDevice")
            .field("device", &self.device)
            .field("actions", &self.callbacks.keys().collect::<Vec<_>>())
            .field("host", &self.host)
            .finish()
    }
}
