use std::fmt::Display;
use std::net::Ipv4Addr;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::util::Error;

/// An ipv4 `host:port` pair naming a delegate or a proxy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Endpoint {
    pub addr: [u8; 4],
    pub port: u16,
}

impl Endpoint {
    pub fn to_socket_addr(self) -> std::net::SocketAddr {
        std::net::SocketAddr::V4(std::net::SocketAddrV4::new(
            std::net::Ipv4Addr::from(self.addr),
            self.port,
        ))
    }
}

impl Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", Ipv4Addr::from(self.addr), self.port)
    }
}

impl From<std::net::SocketAddrV4> for Endpoint {
    fn from(s: std::net::SocketAddrV4) -> Self {
        Self {
            addr: s.ip().octets(),
            port: s.port(),
        }
    }
}

impl FromStr for Endpoint {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Tolerate a scheme prefix such as "http://".
        let s = s.split('/').last().unwrap_or(s);
        let mut parts = s.split(':');
        let addr = parts.next().ok_or(Error::InvalidFormat {
            what: "endpoint",
            reason: "no ip".to_string(),
        })?;
        let port = parts
            .next()
            .ok_or(Error::InvalidFormat {
                what: "endpoint",
                reason: "no port".to_string(),
            })?
            .parse()
            .map_err(|source: std::num::ParseIntError| Error::InvalidFormat {
                what: "endpoint",
                reason: source.to_string(),
            })?;
        let endpoint = Self {
            addr: addr
                .parse::<Ipv4Addr>()
                .map_err(|source| Error::InvalidFormat {
                    what: "endpoint",
                    reason: source.to_string(),
                })?
                .octets(),
            port,
        };
        if parts.next().is_some() {
            return Err(Error::InvalidFormat {
                what: "endpoint",
                reason: "trailing characters after port".to_string(),
            });
        }
        Ok(endpoint)
    }
}

impl Serialize for Endpoint {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Endpoint {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::from_str(&s).map_err(serde::de::Error::custom)
    }
}
