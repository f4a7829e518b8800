use crate::domain::property_value::ValueType;
use crate::domain::request::RequestDescriptor;
use std::time::Duration;

pub const SCHEMA_CONTEXT: &str = "https://iot.mozilla.org/schemas/";

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);
pub const MIN_POLL_INTERVAL: Duration = Duration::from_millis(1);
pub const MAX_POLL_INTERVAL: Duration = Duration::from_secs(7 * 24 * 60 * 60);

#[derive(PartialEq, Debug)]
pub struct Device {
    pub id: String,
    pub title: String,
    pub capabilities: Vec<String>,
    pub actions: Vec<ActionDescriptor>,
    pub properties: Vec<PropertyDescriptor>,
}

impl Device {
    pub fn property(&self, name: &str) -> Option<&PropertyDescriptor> {
        self.properties.iter().find(|property| property.name == name)
    }
}

#[derive(Clone, PartialEq, Debug)]
pub struct ActionDescriptor {
    pub name: String,
    pub description: Option<String>,
    pub semantic_type: Option<String>,
    pub request: RequestDescriptor,
}

#[derive(Clone, PartialEq, Debug)]
pub struct PropertyDescriptor {
    pub name: String,
    pub value_type: ValueType,
    pub poll_interval: Duration,
    pub metadata: PropertyMetadata,
    pub request: RequestDescriptor,
}

impl PropertyDescriptor {
    pub fn new(name: impl Into<String>, value_type: ValueType, poll_interval: Duration, request: RequestDescriptor) -> Self {
        PropertyDescriptor {
            name: name.into(),
            value_type,
            poll_interval,
            metadata: PropertyMetadata::default(),
            request,
        }
    }
}

/// Passed through to the host as-is.
#[derive(Clone, PartialEq, Debug, Default)]
pub struct PropertyMetadata {
    pub title: Option<String>,
    pub description: Option<String>,
    pub semantic_type: Option<String>,
    pub unit: Option<String>,
    pub minimum: Option<f64>,
    pub maximum: Option<f64>,
    pub read_only: bool,
}
