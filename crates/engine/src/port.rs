//! Port binding value type.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// Transport protocol of a published port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    #[default]
    Tcp,
    Udp,
}

impl Protocol {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Tcp => "tcp",
            Self::Udp => "udp",
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Protocol {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "tcp" => Ok(Self::Tcp),
            "udp" => Ok(Self::Udp),
            other => Err(EngineError::Validation {
                name: other.to_owned(),
                reason: "protocol must be tcp or udp".to_owned(),
            }),
        }
    }
}

/// Publishes `container_port/protocol` on `host_ip:host_port`.
///
/// A pure value: no identity, no I/O.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PortBinding {
    pub protocol: Protocol,
    pub container_port: u16,
    /// Host address to bind; empty means all interfaces.
    pub host_ip: String,
    pub host_port: u16,
}

impl PortBinding {
    pub fn new(
        protocol: Protocol,
        container_port: u16,
        host_ip: impl Into<String>,
        host_port: u16,
    ) -> Self {
        Self {
            protocol,
            container_port,
            host_ip: host_ip.into(),
            host_port,
        }
    }

    /// TCP binding on all host interfaces.
    pub fn tcp(container_port: u16, host_port: u16) -> Self {
        Self::new(Protocol::Tcp, container_port, "", host_port)
    }

    /// UDP binding on all host interfaces.
    pub fn udp(container_port: u16, host_port: u16) -> Self {
        Self::new(Protocol::Udp, container_port, "", host_port)
    }

    /// Wire key, e.g. `80/tcp`.
    pub fn key(&self) -> String {
        format!("{}/{}", self.container_port, self.protocol)
    }
}

/// Parses the `docker run -p` short form:
/// `HOST_PORT:CONTAINER_PORT[/PROTO]` or `HOST_IP:HOST_PORT:CONTAINER_PORT[/PROTO]`.
impl FromStr for PortBinding {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| EngineError::Validation {
            name: s.to_owned(),
            reason: reason.to_owned(),
        };

        let (ports, protocol) = match s.rsplit_once('/') {
            Some((ports, proto)) => (ports, proto.parse::<Protocol>()?),
            None => (s, Protocol::Tcp),
        };

        let parts: Vec<&str> = ports.split(':').collect();
        let (host_ip, host_port, container_port) = match parts.as_slice() {
            [host, container] => ("", *host, *container),
            [ip, host, container] => (*ip, *host, *container),
            _ => return Err(invalid("expected HOST_PORT:CONTAINER_PORT[/PROTO]")),
        };

        let host_port = host_port
            .parse::<u16>()
            .map_err(|_| invalid("host port must be 0-65535"))?;
        let container_port = container_port
            .parse::<u16>()
            .map_err(|_| invalid("container port must be 0-65535"))?;

        Ok(Self::new(protocol, container_port, host_ip, host_port))
    }
}
