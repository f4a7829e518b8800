use config::{Config, ConfigError};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct AppConfig {
    core: Core,
    devices: Devices,
    #[serde(default)]
    http: Http,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(config::File::with_name("config").required(true))
            .add_source(config::File::with_name("config_local").required(false))
            .add_source(config::Environment::with_prefix("HTTP_ADAPTER").separator("__"))
            .build()?
            .try_deserialize()
    }

    pub fn core(&self) -> &Core {
        &self.core
    }

    pub fn devices(&self) -> &Devices {
        &self.devices
    }

    pub fn http(&self) -> &Http {
        &self.http
    }
}

#[derive(Debug, Deserialize)]
pub struct Core {
    #[serde(default)]
    verbose: bool,
    store_buffer_size: usize,
}

impl Core {
    /// Enables the request/response diagnostics.
    pub fn verbose(&self) -> bool {
        self.verbose
    }

    pub fn store_buffer_size(&self) -> usize {
        self.store_buffer_size
    }
}

#[derive(Debug, Deserialize)]
pub struct Devices {
    directory: String,
}

impl Devices {
    pub fn directory(&self) -> &str {
        &self.directory
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct Http {
    #[serde(default)]
    accept_invalid_certs: bool,
}

impl Http {
    pub fn accept_invalid_certs(&self) -> bool {
        self.accept_invalid_certs
    }
}

#[cfg(test)]
pub struct AppConfigBuilder {
    config: AppConfig,
}

#[cfg(test)]
impl AppConfigBuilder {
    pub fn new() -> Self {
        AppConfigBuilder {
            config: AppConfig {
                core: Core {
                    verbose: false,
                    store_buffer_size: 1,
                },
                devices: Devices {
                    directory: "devices".to_string(),
                },
                http: Http {
                    accept_invalid_certs: false,
                },
            },
        }
    }

    pub fn accept_invalid_certs(mut self, accept_invalid_certs: bool) -> Self {
        self.config.http.accept_invalid_certs = accept_invalid_certs;
        self
    }

    pub fn build(self) -> AppConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::FileFormat;

    #[test]
    fn deserializes_with_defaults() -> Result<(), ConfigError> {
        let config: AppConfig = Config::builder()
            .add_source(config::File::from_str(
                r#"
                [core]
                store_buffer_size = 16

                [devices]
                directory = "devices"
                "#,
                FileFormat::Toml,
            ))
            .build()?
            .try_deserialize()?;

        assert!(!config.core().verbose());
        assert_eq!(config.core().store_buffer_size(), 16);
        assert_eq!(config.devices().directory(), "devices");
        assert!(!config.http().accept_invalid_certs());
        Ok(())
    }

    #[test]
    fn builder_overrides_the_defaults() {
        let config = AppConfigBuilder::new().accept_invalid_certs(true).build();

        assert!(config.http().accept_invalid_certs());
    }
}
