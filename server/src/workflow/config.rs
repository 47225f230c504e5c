use anyhow::{ensure, Context};
use cxnmath::signal::{FilterParams, DEFAULT_MAX_LAG};
use serde::{Deserialize, Serialize};
use std::fs;
use std::net::{IpAddr, SocketAddr};
use std::path::Path;

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: usize,
    pub max_lag: isize,
    pub filter: FilterParams,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 8000,
            workers: 1,
            max_lag: DEFAULT_MAX_LAG,
            filter: FilterParams::default(),
        }
    }
}

impl ServerConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading server config {}", path_ref.display()))?;
        let config: ServerConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing server config {}", path_ref.display()))?;
        Ok(config)
    }

    pub fn from_args(host: String, port: u16, workers: usize, max_lag: isize) -> Self {
        Self {
            host,
            port,
            workers,
            max_lag,
            ..Default::default()
        }
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        ensure!(self.workers >= 1, "workers must be at least 1");
        ensure!(self.max_lag >= 0, "max_lag must be non-negative");
        self.filter
            .validate()
            .context("validating default filter parameters")?;
        Ok(())
    }

    pub fn bind_address(&self) -> anyhow::Result<SocketAddr> {
        let ip: IpAddr = self
            .host
            .parse()
            .with_context(|| format!("parsing host address {}", self.host))?;
        Ok(SocketAddr::new(ip, self.port))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn config_from_args_keeps_filter_defaults() {
        let cfg = ServerConfig::from_args("127.0.0.1".into(), 9000, 4, 50);
        assert_eq!(cfg.workers, 4);
        assert_eq!(cfg.max_lag, 50);
        assert_eq!(cfg.filter, FilterParams::default());
        assert_eq!(cfg.bind_address().unwrap().to_string(), "127.0.0.1:9000");
    }

    #[test]
    fn config_load_reads_yaml() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(b"port: 8100\nworkers: 2\nfilter:\n  cutoff: 10.0\n")
            .unwrap();
        let path = temp.into_temp_path();
        let cfg = ServerConfig::load(&path).unwrap();
        assert_eq!(cfg.port, 8100);
        assert_eq!(cfg.workers, 2);
        assert_eq!(cfg.host, "0.0.0.0");
        assert_eq!(cfg.filter.cutoff, 10.0);
        assert_eq!(cfg.filter.order, 4);
    }

    #[test]
    fn validate_rejects_bad_values() {
        let mut cfg = ServerConfig::default();
        assert!(cfg.validate().is_ok());

        cfg.workers = 0;
        assert!(cfg.validate().is_err());

        cfg.workers = 1;
        cfg.filter.cutoff = 60.0;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn bind_address_rejects_hostnames() {
        let cfg = ServerConfig::from_args("localhost".into(), 80, 1, 10);
        assert!(cfg.bind_address().is_err());
    }
}
