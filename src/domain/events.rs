use crate::domain::device::Device;
use crate::domain::property_value::PropertyValue;
use std::sync::Arc;

#[derive(Debug)]
pub enum Event {
    DeviceRegistered(Arc<Device>),
    PropertyValuePublished {
        device_id: String,
        property: String,
        value: PropertyValue,
    },
    ActionStarted {
        device_id: String,
        action: String,
    },
    ActionFinished {
        device_id: String,
        action: String,
    },
}
