use crate::http::request_builder::HttpRequest;
use crate::http::transport::{HttpResponse, TransportError};
use std::time::Duration;
use tracing::{info, warn};

/// The verbose channel. Every method is a no-op unless `verbose` is set.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct Diagnostics {
    verbose: bool,
}

impl Diagnostics {
    pub fn new(verbose: bool) -> Self {
        Diagnostics { verbose }
    }

    pub fn verbose(&self) -> bool {
        self.verbose
    }

    pub fn request_sent(&self, request: &HttpRequest) {
        if self.verbose {
            info!(method = %request.method, "➡️ Sending request to {}", request.url);
        }
    }

    pub fn response_received(&self, request: &HttpRequest, response: &HttpResponse, elapsed: Duration) {
        if self.verbose {
            info!(
                status_code = response.status_code,
                elapsed_ms = elapsed.as_millis() as u64,
                "⬅️ {} {} responded {} {} after {} ms",
                request.method,
                request.url,
                response.status_code,
                response.status_text,
                elapsed.as_millis()
            );
        }
    }

    pub fn transport_failed(&self, request: &HttpRequest, error: &TransportError, elapsed: Duration) {
        if self.verbose {
            warn!(
                elapsed_ms = elapsed.as_millis() as u64,
                "⚠️ {} {} failed after {} ms: {}",
                request.method,
                request.url,
                elapsed.as_millis(),
                error
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::request::HttpMethod;
    use std::collections::BTreeMap;
    use std::io;
    use std::sync::{Arc, Mutex};
    use tracing::Level;
    use tracing_subscriber::fmt::MakeWriter;

    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl CapturedLogs {
        fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    impl io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for CapturedLogs {
        type Writer = CapturedLogs;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    fn capture(f: impl FnOnce()) -> String {
        let logs = CapturedLogs::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(logs.clone())
            .with_ansi(false)
            .with_max_level(Level::TRACE)
            .finish();

        tracing::subscriber::with_default(subscriber, f);
        logs.contents()
    }

    fn request() -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            url: "http://device.local/value?unit=c".to_string(),
            headers: BTreeMap::new(),
            body: None,
        }
    }

    fn response() -> HttpResponse {
        HttpResponse {
            status_code: 404,
            status_text: "Not Found".to_string(),
            body: String::new(),
        }
    }

    #[test]
    fn verbose_logs_the_url_status_and_elapsed_time() {
        let diagnostics = Diagnostics::new(true);

        let logs = capture(|| {
            diagnostics.request_sent(&request());
            diagnostics.response_received(&request(), &response(), Duration::from_millis(42));
        });

        assert!(logs.contains("Sending request to http://device.local/value?unit=c"));
        assert!(logs.contains("GET http://device.local/value?unit=c responded 404 Not Found after 42 ms"));
        assert!(logs.contains("elapsed_ms=42"));
    }

    #[test]
    fn verbose_logs_transport_failures() {
        let diagnostics = Diagnostics::new(true);
        let error = TransportError::Unreachable("http://device.local/value?unit=c".to_string());

        let logs = capture(|| diagnostics.transport_failed(&request(), &error, Duration::from_millis(7)));

        assert!(logs.contains("GET http://device.local/value?unit=c failed after 7 ms"));
        assert!(logs.contains("connection refused"));
    }

    #[test]
    fn quiet_diagnostics_log_nothing() {
        let diagnostics = Diagnostics::default();
        let error = TransportError::InvalidMethod("NOT A METHOD".to_string());

        let logs = capture(|| {
            diagnostics.request_sent(&request());
            diagnostics.response_received(&request(), &response(), Duration::from_millis(42));
            diagnostics.transport_failed(&request(), &error, Duration::from_millis(7));
        });

        assert_eq!(logs, "");
    }
}
