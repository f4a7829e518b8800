use crate::domain::device::Device;
use crate::domain::events::Event;
use crate::domain::host::Host;
use crate::domain::property_value::PropertyValue;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::mpsc::{Receiver, Sender};
use tokio::sync::watch;
use tokio::sync::watch::{Receiver as WatchReceiver, Sender as WatchSender};
use tracing::{debug, info, instrument, warn};

/// What the host knows at one point in time.
#[derive(Clone, Debug, Default)]
pub struct StoreSnapshot {
    pub devices: HashMap<String, Arc<Device>>,
    pub values: HashMap<(String, String), PropertyValue>,
    pub running_actions: HashMap<(String, String), usize>,
}

impl StoreSnapshot {
    pub fn value(&self, device_id: &str, property: &str) -> Option<&PropertyValue> {
        self.values.get(&(device_id.to_string(), property.to_string()))
    }
}

/// Sole owner of the registered devices and cached property values; everything else sends it events.
#[derive(Debug)]
pub struct Store {
    snapshot: StoreSnapshot,
    rx: Receiver<Event>,
    notifier_tx: WatchSender<StoreSnapshot>,
    notifier_rx: WatchReceiver<StoreSnapshot>,
}

impl Store {
    pub fn new(rx: Receiver<Event>) -> Self {
        let (notifier_tx, notifier_rx) = watch::channel(StoreSnapshot::default());

        Store {
            snapshot: StoreSnapshot::default(),
            rx,
            notifier_tx,
            notifier_rx,
        }
    }

    pub fn notifier(&self) -> WatchReceiver<StoreSnapshot> {
        self.notifier_rx.clone()
    }

    #[instrument(skip(self))]
    pub async fn listen(&mut self) {
        while let Some(event) = self.rx.recv().await {
            debug!("🔵 Received event: {:?}", event);
            self.apply(event);
            self.notifier_tx.send_replace(self.snapshot.clone());
        }
    }

    fn apply(&mut self, event: Event) {
        match event {
            Event::DeviceRegistered(device) => {
                info!(
                    device_id = device.id.as_str(),
                    "🔵 Registered device '{}' with {} action(s) and {} property(ies)",
                    device.title,
                    device.actions.len(),
                    device.properties.len()
                );
                self.snapshot.devices.insert(device.id.clone(), device);
            }
            Event::PropertyValuePublished { device_id, property, value } => {
                let Some(device) = self.snapshot.devices.get(&device_id) else {
                    warn!(device_id = device_id.as_str(), "⚠️ Received a value for unknown device '{}'", device_id);
                    return;
                };

                if device.property(&property).is_none() {
                    #[rustfmt::skip]
                    warn!(device_id = device_id.as_str(), "⚠️ Unknown property '{}' for device '{}'", property, device.title);
                    return;
                }

                let previous_value = self.snapshot.values.insert((device_id.clone(), property.clone()), value.clone());
                debug!(
                    device_id = device_id.as_str(),
                    "🟢 Updated device '{}', set '{}' to {}, was {:?}",
                    device.title,
                    property,
                    value,
                    previous_value
                );
            }
            Event::ActionStarted { device_id, action } => {
                info!(device_id = device_id.as_str(), "▶️ Action '{}' started", action);
                *self.snapshot.running_actions.entry((device_id, action)).or_default() += 1;
            }
            Event::ActionFinished { device_id, action } => {
                let key = (device_id, action);
                let Some(count) = self.snapshot.running_actions.get_mut(&key) else {
                    warn!(device_id = key.0.as_str(), "⚠️ Action '{}' finished without being started", key.1);
                    return;
                };

                *count -= 1;
                if *count == 0 {
                    self.snapshot.running_actions.remove(&key);
                }
                info!(device_id = key.0.as_str(), "⏹️ Action '{}' finished", key.1);
            }
        }
    }
}

/// The host side of the adapter, backed by a [`Store`].
#[derive(Clone, Debug)]
pub struct StoreHost {
    tx: Sender<Event>,
}

impl StoreHost {
    pub fn new(tx: Sender<Event>) -> Self {
        StoreHost { tx }
    }

    async fn send(&self, event: Event) {
        if let Err(e) = self.tx.send(event).await {
            warn!("⚠️ Store is gone, dropping event: {:?}", e.0);
        }
    }
}

#[async_trait]
impl Host for StoreHost {
    async fn register_device(&self, device: Arc<Device>) {
        self.send(Event::DeviceRegistered(device)).await;
    }

    async fn publish_property_value(&self, device_id: &str, property: &str, value: PropertyValue) {
        self.send(Event::PropertyValuePublished {
            device_id: device_id.to_string(),
            property: property.to_string(),
            value,
        })
        .await;
    }

    async fn action_started(&self, device_id: &str, action: &str) {
        self.send(Event::ActionStarted {
            device_id: device_id.to_string(),
            action: action.to_string(),
        })
        .await;
    }

    async fn action_finished(&self, device_id: &str, action: &str) {
        self.send(Event::ActionFinished {
            device_id: device_id.to_string(),
            action: action.to_string(),
        })
        .await;
    }
}
