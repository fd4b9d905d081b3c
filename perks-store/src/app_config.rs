use perks_shared::ServiceKind;
use serde::Deserialize;
use std::env;
use std::time::Duration;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub simulators: SimulatorEndpoints,
    #[serde(default)]
    pub simulator_ports: SimulatorPorts,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

/// Where the aggregator finds each simulator.
#[derive(Debug, Deserialize, Clone)]
pub struct SimulatorEndpoints {
    pub travel_url: String,
    pub hotel_url: String,
    pub shopping_url: String,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_timeout_ms() -> u64 { 10_000 }

impl SimulatorEndpoints {
    pub fn url_for(&self, service: ServiceKind) -> &str {
        match service {
            ServiceKind::Travel => &self.travel_url,
            ServiceKind::Hotel => &self.hotel_url,
            ServiceKind::Shopping => &self.shopping_url,
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Ports the simulator binary listens on.
#[derive(Debug, Deserialize, Clone)]
pub struct SimulatorPorts {
    pub travel: u16,
    pub hotel: u16,
    pub shopping: u16,
}

impl Default for SimulatorPorts {
    fn default() -> Self {
        Self {
            travel: 5002,
            hotel: 5003,
            shopping: 5004,
        }
    }
}

impl SimulatorPorts {
    pub fn port_for(&self, service: ServiceKind) -> u16 {
        match service {
            ServiceKind::Travel => self.travel,
            ServiceKind::Hotel => self.hotel,
            ServiceKind::Shopping => self.shopping,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            .add_source(config::File::with_name("config/default"))
            // Per-environment overrides, optional
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            // Local overrides, not checked in
            .add_source(config::File::with_name("config/local").required(false))
            // Eg.. `PERKS_SIMULATORS__TIMEOUT_MS=2000`
            .add_source(config::Environment::with_prefix("PERKS").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::{File, FileFormat};

    const BASE: &str = r#"
        [server]
        port = 5000

        [simulators]
        travel_url = "http://localhost:5002"
        hotel_url = "http://localhost:5003"
        shopping_url = "http://localhost:5004"
    "#;

    #[test]
    fn test_defaults_fill_timeout_and_ports() {
        let config: Config = config::Config::builder()
            .add_source(File::from_str(BASE, FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.server.port, 5000);
        assert_eq!(config.simulators.timeout(), Duration::from_secs(10));
        assert_eq!(config.simulator_ports.port_for(ServiceKind::Hotel), 5003);
        assert_eq!(config.simulators.url_for(ServiceKind::Shopping), "http://localhost:5004");
    }

    #[test]
    fn test_override_layer_wins() {
        let config: Config = config::Config::builder()
            .add_source(File::from_str(BASE, FileFormat::Toml))
            .add_source(File::from_str("[simulators]\ntimeout_ms = 250", FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.simulators.timeout(), Duration::from_millis(250));
        assert_eq!(config.simulators.url_for(ServiceKind::Travel), "http://localhost:5002");
    }
}
