use crate::domain::device::{
    ActionDescriptor, DEFAULT_POLL_INTERVAL, Device, MAX_POLL_INTERVAL, MIN_POLL_INTERVAL, PropertyDescriptor, PropertyMetadata,
};
use crate::domain::property_value::ValueType;
use crate::domain::request::{FORM_URL_ENCODED, HttpMethod, Parameter, RequestDescriptor};
use serde::Deserialize;
use std::collections::HashSet;
use std::time::Duration;
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SerializedDevice {
    id: String,
    title: String,
    #[serde(default)]
    capabilities: Vec<String>,
    #[serde(default)]
    actions: Vec<SerializedAction>,
    #[serde(default)]
    properties: Vec<SerializedProperty>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SerializedRequest {
    url: String,
    #[serde(default = "default_method")]
    method: HttpMethod,
    content_type: Option<String>,
    #[serde(default)]
    query_parameters: Vec<Parameter>,
    #[serde(default)]
    body_parameters: Vec<Parameter>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SerializedAction {
    name: String,
    description: Option<String>,
    semantic_type: Option<String>,
    #[serde(flatten)]
    request: SerializedRequest,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SerializedProperty {
    name: String,
    #[serde(default)]
    value_type: ValueType,
    poll_interval: Option<f64>,
    title: Option<String>,
    description: Option<String>,
    semantic_type: Option<String>,
    unit: Option<String>,
    minimum: Option<f64>,
    maximum: Option<f64>,
    #[serde(default)]
    read_only: bool,
    #[serde(flatten)]
    request: SerializedRequest,
}

fn default_method() -> HttpMethod {
    HttpMethod::Get
}

#[derive(Error, Debug, PartialEq)]
pub enum DeviceConfigError {
    #[error("device id must not be empty")]
    MissingId,
    #[error("device '{0}' has no title")]
    MissingTitle(String),
    #[error("{0} name must not be empty")]
    MissingName(&'static str),
    #[error("duplicate {kind} '{name}'")]
    DuplicateName { kind: &'static str, name: String },
    #[error("parameter of '{0}' has no name")]
    UnnamedParameter(String),
}

impl TryFrom<SerializedDevice> for Device {
    type Error = DeviceConfigError;

    fn try_from(device: SerializedDevice) -> Result<Self, Self::Error> {
        if device.id.is_empty() {
            return Err(DeviceConfigError::MissingId);
        }
        if device.title.is_empty() {
            return Err(DeviceConfigError::MissingTitle(device.id));
        }

        let actions = device.actions.into_iter().map(to_action).collect::<Result<Vec<_>, _>>()?;
        ensure_unique("action", actions.iter().map(|a| a.name.as_str()))?;

        let properties = device.properties.into_iter().map(to_property).collect::<Result<Vec<_>, _>>()?;
        ensure_unique("property", properties.iter().map(|p| p.name.as_str()))?;

        Ok(Device {
            id: device.id,
            title: device.title,
            capabilities: device.capabilities,
            actions,
            properties,
        })
    }
}

fn to_action(action: SerializedAction) -> Result<ActionDescriptor, DeviceConfigError> {
    if action.name.is_empty() {
        return Err(DeviceConfigError::MissingName("action"));
    }

    Ok(ActionDescriptor {
        request: to_request(&action.name, action.request)?,
        name: action.name,
        description: action.description,
        semantic_type: action.semantic_type,
    })
}

fn to_property(property: SerializedProperty) -> Result<PropertyDescriptor, DeviceConfigError> {
    if property.name.is_empty() {
        return Err(DeviceConfigError::MissingName("property"));
    }

    let poll_interval = match property.poll_interval {
        Some(seconds) => to_poll_interval(seconds).unwrap_or_else(|| {
            #[rustfmt::skip]
            warn!("⚠️ Invalid poll interval {} for property '{}', using {:?}", seconds, property.name, DEFAULT_POLL_INTERVAL);
            DEFAULT_POLL_INTERVAL
        }),
        None => DEFAULT_POLL_INTERVAL,
    };

    Ok(PropertyDescriptor {
        request: to_request(&property.name, property.request)?,
        name: property.name,
        value_type: property.value_type,
        poll_interval,
        metadata: PropertyMetadata {
            title: property.title,
            description: property.description,
            semantic_type: property.semantic_type,
            unit: property.unit,
            minimum: property.minimum,
            maximum: property.maximum,
            read_only: property.read_only,
        },
    })
}

/// `None` for negative, non-finite or out of range values.
fn to_poll_interval(seconds: f64) -> Option<Duration> {
    Duration::try_from_secs_f64(seconds)
        .ok()
        .filter(|interval| (MIN_POLL_INTERVAL..=MAX_POLL_INTERVAL).contains(interval))
}

fn to_request(owner: &str, request: SerializedRequest) -> Result<RequestDescriptor, DeviceConfigError> {
    let unnamed = |parameters: &[Parameter]| parameters.iter().any(|p| p.name.is_empty());
    if unnamed(&request.query_parameters) || unnamed(&request.body_parameters) {
        return Err(DeviceConfigError::UnnamedParameter(owner.to_string()));
    }

    Ok(RequestDescriptor {
        url: request.url,
        method: request.method,
        content_type: request.content_type.unwrap_or_else(|| FORM_URL_ENCODED.to_string()),
        query_parameters: request.query_parameters,
        body_parameters: request.body_parameters,
    })
}

fn ensure_unique<'a>(kind: &'static str, names: impl Iterator<Item = &'a str>) -> Result<(), DeviceConfigError> {
    let mut seen = HashSet::new();
    for name in names {
        if !seen.insert(name) {
            return Err(DeviceConfigError::DuplicateName {
                kind,
                name: name.to_string(),
            });
        }
    }
    Ok(())
}
