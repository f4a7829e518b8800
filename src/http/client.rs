use crate::app_config::AppConfig;
use reqwest::Client;
use thiserror::Error;

pub fn new_client(config: &AppConfig) -> Result<Client, HttpClientError> {
    let client = Client::builder()
        .danger_accept_invalid_certs(config.http().accept_invalid_certs())
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .build()?;
    Ok(client)
}

#[derive(Error, Debug)]
pub enum HttpClientError {
    #[error("unable to build the http client: {0}")]
    Build(#[from] reqwest::Error),
}
