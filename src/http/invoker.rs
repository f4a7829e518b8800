use crate::domain::request::RequestDescriptor;
use crate::http::diagnostics::Diagnostics;
use crate::http::request_builder::{self, RequestBuildError};
use crate::http::transport::{HttpResponse, HttpTransport, TransportError};
use std::sync::Arc;
use thiserror::Error;
use tokio::time::Instant;

/// Builds and sends the request of a descriptor. Shared by actions and property pollers.
#[derive(Debug)]
pub struct Invoker {
    transport: Arc<dyn HttpTransport>,
    diagnostics: Diagnostics,
}

#[derive(Error, Debug)]
pub enum InvokeError {
    #[error(transparent)]
    Build(#[from] RequestBuildError),
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error("request failed with status {status_code} {status_text}")]
    Status { status_code: u16, status_text: String },
}

impl Invoker {
    pub fn new(transport: Arc<dyn HttpTransport>, diagnostics: Diagnostics) -> Self {
        Invoker { transport, diagnostics }
    }

    pub fn diagnostics(&self) -> Diagnostics {
        self.diagnostics
    }

    pub async fn call(&self, descriptor: &RequestDescriptor) -> Result<HttpResponse, InvokeError> {
        let request = request_builder::build(descriptor)?;

        self.diagnostics.request_sent(&request);
        let started = Instant::now();

        let response = match self.transport.send(&request).await {
            Ok(response) => response,
            Err(e) => {
                self.diagnostics.transport_failed(&request, &e, started.elapsed());
                return Err(e.into());
            }
        };
        self.diagnostics.response_received(&request, &response, started.elapsed());

        if !response.is_success() {
            return Err(InvokeError::Status {
                status_code: response.status_code,
                status_text: response.status_text,
            });
        }

        Ok(response)
    }
}
