use crate::domain::device::Device;
use crate::domain::host::Host;
use crate::domain::property_value::PropertyValue;
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

#[derive(Clone, PartialEq, Debug)]
pub struct Published {
    pub device_id: String,
    pub property: String,
    pub value: PropertyValue,
}

#[derive(Clone, PartialEq, Debug)]
pub enum Lifecycle {
    Started(String, String),
    Finished(String, String),
}

/// Remembers everything the adapter reports.
#[derive(Debug, Default)]
pub struct RecordingHost {
    registered: Mutex<Vec<String>>,
    published: Mutex<Vec<Published>>,
    lifecycle: Mutex<Vec<Lifecycle>>,
}

impl RecordingHost {
    pub fn registered(&self) -> Vec<String> {
        self.registered.lock().unwrap().clone()
    }

    pub fn published(&self) -> Vec<Published> {
        self.published.lock().unwrap().clone()
    }

    pub fn lifecycle(&self) -> Vec<Lifecycle> {
        self.lifecycle.lock().unwrap().clone()
    }
}

#[async_trait]
impl Host for RecordingHost {
    async fn register_device(&self, device: Arc<Device>) {
        self.registered.lock().unwrap().push(device.id.clone());
    }

    async fn publish_property_value(&self, device_id: &str, property: &str, value: PropertyValue) {
        self.published.lock().unwrap().push(Published {
            device_id: device_id.to_string(),
            property: property.to_string(),
            value,
        });
    }

    async fn action_started(&self, device_id: &str, action: &str) {
        self.lifecycle.lock().unwrap().push(Lifecycle::Started(device_id.to_string(), action.to_string()));
    }

    async fn action_finished(&self, device_id: &str, action: &str) {
        self.lifecycle.lock().unwrap().push(Lifecycle::Finished(device_id.to_string(), action.to_string()));
    }
}
