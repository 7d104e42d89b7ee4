use std::fs;

use serde::{Deserialize, Serialize};

use super::Endpoint;
use crate::blocks::DELEGATE_COUNT;
use crate::keys::NetworkMode;
use crate::util::Error;

/// Where blocks go: the 32-entry delegate table, an optional HTTP proxy, and
/// which network's work rules apply. Pure data, handed to a
/// [Publisher](crate::rpc::Publisher) by the caller.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PublishConfig {
    pub delegates: Vec<Endpoint>,
    pub proxy: Option<Endpoint>,
    pub mode: NetworkMode,
}

impl PublishConfig {
    pub fn new(delegates: Vec<Endpoint>, mode: NetworkMode) -> Result<Self, Error> {
        Self::check_delegates(&delegates)?;
        Ok(Self {
            delegates,
            proxy: None,
            mode,
        })
    }

    pub fn from_toml(s: &str) -> Result<Self, Error> {
        let config: Self = toml::from_str(s)?;
        Self::check_delegates(&config.delegates)?;
        Ok(config)
    }

    pub fn from_file(path: &str) -> Result<Self, Error> {
        Self::from_toml(&fs::read_to_string(path)?)
    }

    /// The delegate a block's routing index names.
    pub fn delegate(&self, index: u8) -> Endpoint {
        self.delegates[index as usize % DELEGATE_COUNT]
    }

    fn check_delegates(delegates: &[Endpoint]) -> Result<(), Error> {
        if delegates.len() != DELEGATE_COUNT {
            return Err(Error::InvalidFormat {
                what: "delegates",
                reason: format!(
                    "expected {} entries, got {}",
                    DELEGATE_COUNT,
                    delegates.len()
                ),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn table() -> Vec<Endpoint> {
        (0..DELEGATE_COUNT as u16)
            .map(|i| Endpoint::from_str(&format!("127.0.0.1:{}", 4100 + i)).unwrap())
            .collect()
    }

    #[test]
    fn delegate_table_must_be_full() {
        assert!(PublishConfig::new(table(), NetworkMode::Test).is_ok());
        assert!(matches!(
            PublishConfig::new(table()[..5].to_vec(), NetworkMode::Test),
            Err(Error::InvalidFormat { what: "delegates", .. })
        ));
    }

    #[test]
    fn delegate_lookup() {
        let config = PublishConfig::new(table(), NetworkMode::Live).unwrap();
        assert_eq!(config.delegate(0).port, 4100);
        assert_eq!(config.delegate(31).port, 4131);
    }

    #[test]
    fn toml_round_trip() {
        let mut config = PublishConfig::new(table(), NetworkMode::Test).unwrap();
        config.proxy = Some(Endpoint::from_str("127.0.0.1:8080").unwrap());

        let serialized = toml::to_string(&config).unwrap();
        let restored = PublishConfig::from_toml(&serialized).unwrap();
        assert_eq!(restored.delegates, config.delegates);
        assert_eq!(restored.proxy, config.proxy);
        assert_eq!(restored.mode, NetworkMode::Test);

        assert!(PublishConfig::from_toml("delegates = []\nmode = \"test\"").is_err());
    }
}
