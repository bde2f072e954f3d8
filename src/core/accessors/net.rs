//! Host and port endpoints

use crate::core::store::PropertyStore;
use crate::domain::{Result, StrataError};
use std::fmt;
use std::io;
use std::net::{SocketAddr, ToSocketAddrs};
use url::Url;

/// An unresolved `host:port` endpoint
///
/// Resolution is deferred to [`ToSocketAddrs`], so building one never touches
/// the network.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HostPort {
    pub host: String,
    pub port: u16,
}

impl HostPort {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    /// Parses `host`, `host:port`, `[v6]:port` or `scheme://host:port/path`
    ///
    /// # Errors
    ///
    /// Returns [`StrataError::InvalidArgument`] naming `input` and `key` when
    /// no host can be found or the port is malformed
    pub fn parse(input: &str, default_port: u16, key: &str) -> Result<Self> {
        let target = input.trim();
        let invalid = || {
            StrataError::InvalidArgument(format!(
                "Does not contain a valid host:port authority: {target} (configuration property '{key}')"
            ))
        };

        let url = if target.contains("://") {
            Url::parse(target)
        } else {
            Url::parse(&format!("dummyscheme://{target}"))
        }
        .map_err(|_| invalid())?;

        let host = url
            .host_str()
            .filter(|h| !h.is_empty())
            .ok_or_else(invalid)?;
        let host = host
            .strip_prefix('[')
            .and_then(|h| h.strip_suffix(']'))
            .unwrap_or(host);

        // `Url` drops a port equal to the scheme default, so recover it when
        // the authority spelled one out.
        let port = match url.port() {
            Some(port) => Some(port),
            None if has_explicit_port(target) => url.port_or_known_default(),
            None => None,
        };
        Ok(Self::new(host, port.unwrap_or(default_port)))
    }
}

fn has_explicit_port(target: &str) -> bool {
    let rest = target.split_once("://").map_or(target, |(_, rest)| rest);
    let end = rest
        .find(|c| matches!(c, '/' | '?' | '#'))
        .unwrap_or(rest.len());
    let authority = &rest[..end];
    let host_port = authority.rsplit_once('@').map_or(authority, |(_, hp)| hp);
    host_port
        .rsplit(']')
        .next()
        .is_some_and(|tail| tail.contains(':'))
}

impl fmt::Display for HostPort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.host.contains(':') {
            write!(f, "[{}]:{}", self.host, self.port)
        } else {
            write!(f, "{}:{}", self.host, self.port)
        }
    }
}

impl ToSocketAddrs for HostPort {
    type Iter = std::vec::IntoIter<SocketAddr>;

    fn to_socket_addrs(&self) -> io::Result<Self::Iter> {
        (self.host.as_str(), self.port).to_socket_addrs()
    }
}

impl PropertyStore {
    /// Endpoint stored under `name`, or `default_addr` when absent
    ///
    /// # Errors
    ///
    /// Returns [`StrataError::InvalidArgument`] for a malformed endpoint
    pub fn get_socket_addr(
        &self,
        name: &str,
        default_addr: &str,
        default_port: u16,
    ) -> Result<HostPort> {
        let address = self.get_trimmed_or(name, default_addr)?;
        HostPort::parse(&address, default_port, name)
    }

    /// # Errors
    ///
    /// Returns [`StrataError::InvalidArgument`] for a blank name
    pub fn set_socket_addr(&self, name: &str, addr: &HostPort) -> Result<()> {
        self.set(name, addr.to_string())
    }
}
