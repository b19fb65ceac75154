//! Service configuration, read from environment variables.

use anyhow::{anyhow, Context, Result};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// TorchScript classifier
    pub model_path: String,
    /// JSON column → fitted classes
    pub encoders_path: String,
    /// JSON array of column names in training order
    pub feature_order_path: String,
    pub bind_addr: IpAddr,
    pub port: u16,
    /// Model output index → severity class
    pub classes: Vec<i64>,
    /// Log every encoded row before it reaches the model
    pub log_pred: bool,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| lookup(key).ok_or_else(|| anyhow!("{} not set", key));

        let bind_addr: IpAddr = match lookup("BIND_ADDR") {
            Some(s) => s
                .parse()
                .with_context(|| format!("BIND_ADDR {:?} is not an IP address", s))?,
            None => IpAddr::V4(Ipv4Addr::UNSPECIFIED),
        };
        let port: u16 = match lookup("PORT") {
            Some(s) => s.parse().with_context(|| format!("PORT {:?} is not a port", s))?,
            None => 8080,
        };
        let classes = match lookup("SEVERITY_CLASSES") {
            Some(s) => parse_classes(&s)?,
            None => vec![1, 2, 3],
        };

        Ok(Self {
            model_path: required("MODEL_PATH")?,
            encoders_path: required("ENCODERS_PATH")?,
            feature_order_path: required("FEATURE_ORDER_PATH")?,
            bind_addr,
            port,
            classes,
            log_pred: lookup("LOG_PRED").as_deref() == Some("1"),
        })
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_addr, self.port)
    }
}

fn parse_classes(s: &str) -> Result<Vec<i64>> {
    let classes = s
        .split(',')
        .map(|c| {
            c.trim()
                .parse::<i64>()
                .with_context(|| format!("SEVERITY_CLASSES entry {:?} is not an integer", c))
        })
        .collect::<Result<Vec<_>>>()?;
    if classes.is_empty() {
        anyhow::bail!("SEVERITY_CLASSES is empty");
    }
    Ok(classes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn base() -> HashMap<String, String> {
        env(&[
            ("MODEL_PATH", "model.pt"),
            ("ENCODERS_PATH", "encoders.json"),
            ("FEATURE_ORDER_PATH", "feature_order.json"),
        ])
    }

    #[test]
    fn test_defaults() {
        let vars = base();
        let config = AppConfig::from_lookup(|k| vars.get(k).cloned()).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.classes, vec![1, 2, 3]);
        assert!(!config.log_pred);
        assert_eq!(config.socket_addr().to_string(), "0.0.0.0:8080");
    }

    #[test]
    fn test_overrides() {
        let mut vars = base();
        vars.extend(env(&[
            ("PORT", "9000"),
            ("BIND_ADDR", "127.0.0.1"),
            ("SEVERITY_CLASSES", "3, 2, 1"),
            ("LOG_PRED", "1"),
        ]));
        let config = AppConfig::from_lookup(|k| vars.get(k).cloned()).unwrap();
        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:9000");
        assert_eq!(config.classes, vec![3, 2, 1]);
        assert!(config.log_pred);
    }

    #[test]
    fn test_missing_required() {
        let mut vars = base();
        vars.remove("ENCODERS_PATH");
        let err = AppConfig::from_lookup(|k| vars.get(k).cloned()).unwrap_err();
        assert!(err.to_string().contains("ENCODERS_PATH"));
    }

    #[test]
    fn test_bad_port() {
        let mut vars = base();
        vars.insert("PORT".to_string(), "eighty".to_string());
        assert!(AppConfig::from_lookup(|k| vars.get(k).cloned()).is_err());
    }
}
