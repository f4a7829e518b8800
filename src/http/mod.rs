mod client;
pub mod diagnostics;
pub mod invoker;
pub mod request_builder;
pub mod transport;

pub use client::{HttpClientError, new_client};
