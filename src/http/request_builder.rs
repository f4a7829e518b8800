use crate::domain::request::{FORM_URL_ENCODED, HttpMethod, JSON, Parameter, RequestDescriptor};
use std::collections::BTreeMap;
use thiserror::Error;
use url::Url;
use url::form_urlencoded::Serializer;

pub const CONTENT_TYPE: &str = "Content-Type";

/// A request ready to be handed to a transport.
#[derive(Clone, PartialEq, Debug)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: BTreeMap<String, String>,
    pub body: Option<String>,
}

#[derive(Error, Debug)]
pub enum RequestBuildError {
    #[error("invalid url '{url}': {source}")]
    InvalidUrl { url: String, source: url::ParseError },
    #[error("unsupported content type '{0}'")]
    UnsupportedContentType(String),
    #[error("unable to serialize the json body: {0}")]
    Json(#[from] serde_json::Error),
}

pub fn build(descriptor: &RequestDescriptor) -> Result<HttpRequest, RequestBuildError> {
    let url = build_url(&descriptor.url, &descriptor.query_parameters)?;

    if !descriptor.method.has_body() {
        return Ok(HttpRequest {
            method: descriptor.method.clone(),
            url,
            headers: BTreeMap::new(),
            body: None,
        });
    }

    let body = match essence(&descriptor.content_type).as_str() {
        FORM_URL_ENCODED => form_body(&descriptor.body_parameters),
        JSON => json_body(&descriptor.body_parameters)?,
        _ => return Err(RequestBuildError::UnsupportedContentType(descriptor.content_type.clone())),
    };

    Ok(HttpRequest {
        method: descriptor.method.clone(),
        url,
        headers: BTreeMap::from([(CONTENT_TYPE.to_string(), descriptor.content_type.clone())]),
        body: Some(body),
    })
}

fn build_url(raw: &str, query_parameters: &[Parameter]) -> Result<String, RequestBuildError> {
    let mut url = Url::parse(raw).map_err(|source| RequestBuildError::InvalidUrl {
        url: raw.to_string(),
        source,
    })?;

    // query_pairs_mut leaves a dangling '?' behind even if nothing is appended
    if !query_parameters.is_empty() {
        url.query_pairs_mut()
            .extend_pairs(query_parameters.iter().map(|p| (p.name.as_str(), p.value.as_str())));
    }

    Ok(url.into())
}

fn form_body(parameters: &[Parameter]) -> String {
    Serializer::new(String::new())
        .extend_pairs(parameters.iter().map(|p| (p.name.as_str(), p.value.as_str())))
        .finish()
}

// Object semantics: a repeated name keeps its first position but takes the last value.
fn json_body(parameters: &[Parameter]) -> Result<String, RequestBuildError> {
    let mut object = serde_json::Map::new();
    for parameter in parameters {
        object.insert(parameter.name.clone(), serde_json::Value::String(parameter.value.clone()));
    }

    Ok(serde_json::to_string(&object)?)
}

fn essence(content_type: &str) -> String {
    content_type.split(';').next().unwrap_or_default().trim().to_ascii_lowercase()
}
