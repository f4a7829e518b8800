use serde::Deserialize;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

pub const FORM_URL_ENCODED: &str = "application/x-www-form-urlencoded";
pub const JSON: &str = "application/json";

#[derive(Clone, PartialEq, Eq, Debug, Deserialize)]
pub struct Parameter {
    pub name: String,
    pub value: String,
}

impl Parameter {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Parameter {
            name: name.into(),
            value: value.into(),
        }
    }
}

#[derive(Clone, PartialEq, Eq, Debug, Deserialize)]
#[serde(from = "String")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Other(String),
}

impl HttpMethod {
    pub fn as_str(&self) -> &str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Other(method) => method,
        }
    }

    /// Only POST and PUT carry a body.
    pub fn has_body(&self) -> bool {
        matches!(self, HttpMethod::Post | HttpMethod::Put)
    }
}

impl From<String> for HttpMethod {
    fn from(value: String) -> Self {
        match value.to_ascii_uppercase().as_str() {
            "GET" => HttpMethod::Get,
            "POST" => HttpMethod::Post,
            "PUT" => HttpMethod::Put,
            other => HttpMethod::Other(other.to_string()),
        }
    }
}

impl FromStr for HttpMethod {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(HttpMethod::from(s.to_string()))
    }
}

impl Display for HttpMethod {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where and how to send a single HTTP call. Shared by actions and properties.
#[derive(Clone, PartialEq, Debug)]
pub struct RequestDescriptor {
    pub url: String,
    pub method: HttpMethod,
    pub content_type: String,
    pub query_parameters: Vec<Parameter>,
    pub body_parameters: Vec<Parameter>,
}

impl RequestDescriptor {
    pub fn builder(url: impl Into<String>, method: HttpMethod) -> RequestDescriptorBuilder {
        RequestDescriptorBuilder::new(url, method)
    }
}

pub struct RequestDescriptorBuilder {
    descriptor: RequestDescriptor,
}

impl RequestDescriptorBuilder {
    pub fn new(url: impl Into<String>, method: HttpMethod) -> Self {
        RequestDescriptorBuilder {
            descriptor: RequestDescriptor {
                url: url.into(),
                method,
                content_type: FORM_URL_ENCODED.to_string(),
                query_parameters: Vec::new(),
                body_parameters: Vec::new(),
            },
        }
    }

    pub fn content_type(mut self, content_type: impl Into<String>) -> Self {
        self.descriptor.content_type = content_type.into();
        self
    }

    pub fn query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.descriptor.query_parameters.push(Parameter::new(name, value));
        self
    }

    pub fn body(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.descriptor.body_parameters.push(Parameter::new(name, value));
        self
    }

    pub fn build(self) -> RequestDescriptor {
        self.descriptor
    }
}
