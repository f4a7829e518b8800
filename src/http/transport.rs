use crate::http::request_builder::HttpRequest;
use async_trait::async_trait;
use reqwest::{Client, Method};
use std::fmt::Debug;
use thiserror::Error;

#[derive(Clone, PartialEq, Debug)]
pub struct HttpResponse {
    pub status_code: u16,
    pub status_text: String,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }
}

#[derive(Error, Debug)]
pub enum TransportError {
    #[error("request error: {0}")]
    Request(#[from] reqwest::Error),
    #[error("invalid http method '{0}'")]
    InvalidMethod(String),
    #[cfg(test)]
    #[error("connection refused: {0}")]
    Unreachable(String),
}

#[async_trait]
pub trait HttpTransport: Debug + Send + Sync {
    /// Sends the request and reads the whole body as text, whatever the status code.
    async fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError>;
}

#[derive(Clone, Debug)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new(client: Client) -> Self {
        ReqwestTransport { client }
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        let method = Method::from_bytes(request.method.as_str().as_bytes()).map_err(|_| TransportError::InvalidMethod(request.method.to_string()))?;

        let mut builder = self.client.request(method, request.url.as_str());
        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }
        if let Some(body) = &request.body {
            builder = builder.body(body.clone());
        }

        let response = builder.send().await?;
        let status = response.status();
        let body = response.text().await?;

        Ok(HttpResponse {
            status_code: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or_default().to_string(),
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::request::{HttpMethod, JSON, RequestDescriptor};
    use crate::http::request_builder::build;
    use pretty_assertions::assert_eq;
    use std::error::Error;

    #[tokio::test]
    async fn send_issues_a_get_with_query_parameters() -> Result<(), Box<dyn Error>> {
        let mut server = mockito::Server::new_async().await;

        let mock = server
            .mock("GET", "/temperature")
            .match_query(mockito::Matcher::UrlEncoded("unit".into(), "celsius".into()))
            .with_status(200)
            .with_body("21.5")
            .create_async()
            .await;

        let descriptor = RequestDescriptor::builder(format!("{}/temperature", server.url()), HttpMethod::Get)
            .query("unit", "celsius")
            .build();
        let response = ReqwestTransport::new(Client::new()).send(&build(&descriptor)?).await?;

        mock.assert_async().await;
        assert_eq!(
            response,
            HttpResponse {
                status_code: 200,
                status_text: "OK".to_string(),
                body: "21.5".to_string(),
            }
        );

        Ok(())
    }

    #[tokio::test]
    async fn send_issues_a_put_with_content_type_and_body() -> Result<(), Box<dyn Error>> {
        let mut server = mockito::Server::new_async().await;

        let mock = server
            .mock("PUT", "/light")
            .match_header("content-type", JSON)
            .match_body(r#"{"on":"true"}"#)
            .with_status(204)
            .create_async()
            .await;

        let descriptor = RequestDescriptor::builder(format!("{}/light", server.url()), HttpMethod::Put)
            .content_type(JSON)
            .body("on", "true")
            .build();
        let response = ReqwestTransport::new(Client::new()).send(&build(&descriptor)?).await?;

        mock.assert_async().await;
        assert_eq!(response.status_code, 204);
        assert!(response.is_success());

        Ok(())
    }

    #[tokio::test]
    async fn send_returns_non_success_responses() -> Result<(), Box<dyn Error>> {
        let mut server = mockito::Server::new_async().await;

        let mock = server.mock("POST", "/").with_status(500).with_body("boom").create_async().await;

        let descriptor = RequestDescriptor::builder(format!("{}/", server.url()), HttpMethod::Post).build();
        let response = ReqwestTransport::new(Client::new()).send(&build(&descriptor)?).await?;

        mock.assert_async().await;
        assert_eq!(response.status_code, 500);
        assert_eq!(response.status_text, "Internal Server Error");
        assert_eq!(response.body, "boom");
        assert!(!response.is_success());

        Ok(())
    }

    #[tokio::test]
    async fn send_rejects_an_invalid_method() -> Result<(), Box<dyn Error>> {
        let descriptor = RequestDescriptor::builder("http://localhost/", HttpMethod::Other("NOT A METHOD".to_string())).build();

        let result = ReqwestTransport::new(Client::new()).send(&build(&descriptor)?).await;

        assert!(matches!(result, Err(TransportError::InvalidMethod(method)) if method == "NOT A METHOD"));
        Ok(())
    }
}
