use crate::domain::device::ActionDescriptor;
use crate::http::invoker::{InvokeError, Invoker};
use std::sync::Arc;
use tracing::{debug, instrument, warn};

/// Sends the request of an action once per trigger. The response is only logged.
#[derive(Clone, Debug)]
pub struct ActionInvoker {
    invoker: Arc<Invoker>,
}

impl ActionInvoker {
    pub fn new(invoker: Arc<Invoker>) -> Self {
        ActionInvoker { invoker }
    }

    #[instrument(skip_all, fields(device_id = device_id, action = action.name.as_str()))]
    pub async fn invoke(&self, device_id: &str, action: &ActionDescriptor) {
        match self.invoker.call(&action.request).await {
            Ok(response) => debug!(status_code = response.status_code, "⚡ Invoked action '{}'", action.name),
            Err(InvokeError::Build(e)) => warn!("⚠️ Unable to build the request for action '{}': {}", action.name, e),
            Err(e) if self.invoker.diagnostics().verbose() => warn!("⚠️ Invoking action '{}' failed: {}", action.name, e),
            Err(_) => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::request::{HttpMethod, RequestDescriptor};
    use crate::http::diagnostics::Diagnostics;
    use crate::http::invoker::fakes::FakeTransport;
    use pretty_assertions::assert_eq;
    use test_log::test;

    fn action(request: RequestDescriptor) -> ActionDescriptor {
        ActionDescriptor {
            name: "toggle".to_string(),
            description: None,
            semantic_type: None,
            request,
        }
    }

    #[test(tokio::test)]
    async fn invoke_sends_the_request_once() {
        let transport = Arc::new(FakeTransport::new().respond("http://device.local/toggle", 200, "ok"));
        let invoker = ActionInvoker::new(Arc::new(Invoker::new(transport.clone(), Diagnostics::new(true))));

        let descriptor = RequestDescriptor::builder("http://device.local/toggle", HttpMethod::Post).body("state", "on").build();
        invoker.invoke("device", &action(descriptor)).await;

        let requests = transport.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].body.as_deref(), Some("state=on"));
    }

    #[test(tokio::test)]
    async fn invoke_swallows_failures() {
        let transport = Arc::new(FakeTransport::new());
        let invoker = ActionInvoker::new(Arc::new(Invoker::new(transport.clone(), Diagnostics::default())));

        invoker
            .invoke("device", &action(RequestDescriptor::builder("http://unreachable.local/", HttpMethod::Get).build()))
            .await;

        assert_eq!(transport.requests().len(), 1);
    }
}
