use crate::domain::device::Device;
use crate::domain::property_value::PropertyValue;
use async_trait::async_trait;
use std::fmt::Debug;
use std::sync::Arc;

/// The device-management runtime the adapter reports to.
#[async_trait]
pub trait Host: Debug + Send + Sync {
    async fn register_device(&self, device: Arc<Device>);

    /// Called on every successful poll, also when the value did not change.
    async fn publish_property_value(&self, device_id: &str, property: &str, value: PropertyValue);

    async fn action_started(&self, device_id: &str, action: &str);

    async fn action_finished(&self, device_id: &str, action: &str);
}
