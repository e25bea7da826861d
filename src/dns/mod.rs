//! Hostname resolution and the client's per-session DNS cache.
//!
//! The cache is a diagnostic and warm-up aid: the client resolves and
//! remembers the numeric address of every host it contacts, but the request
//! still goes out under the original hostname.

use std::net::{IpAddr, ToSocketAddrs};

use hashbrown::HashMap;

use crate::error::{Error, Result};

/// Hostname-to-address resolution capability.
///
/// Injectable so tests (or an async resolver) can stand in for the system
/// one.
pub trait Resolve {
    /// Resolve `host` to a numeric address.
    ///
    /// # Errors
    ///
    /// [`Error::Client`] (code 0) when the host does not resolve.
    fn resolve(&self, host: &str) -> Result<IpAddr>;
}

/// Blocking resolver over the operating system's lookup machinery.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemResolver;

impl Resolve for SystemResolver {
    fn resolve(&self, host: &str) -> Result<IpAddr> {
        let host_port = format!("{host}:0");

        host_port
            .as_str()
            .to_socket_addrs()
            .ok()
            .and_then(|mut addrs| addrs.next())
            .map(|addr| addr.ip())
            .ok_or_else(|| {
                Error::client(
                    format!("Cannot resolve '{host}' to a numerical IP address"),
                    0,
                )
            })
    }
}

/// Hostname -> resolved address map with process lifetime, manually
/// resettable.
#[derive(Debug, Default, Clone)]
pub struct DnsCache {
    entries: HashMap<String, IpAddr>,
}

impl DnsCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn contains(&self, host: &str) -> bool {
        self.entries.contains_key(host)
    }

    #[must_use]
    pub fn get(&self, host: &str) -> Option<IpAddr> {
        self.entries.get(host).copied()
    }

    pub fn insert(&mut self, host: impl Into<String>, addr: IpAddr) {
        self.entries.insert(host.into(), addr);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

/// True when `host` contains at least one alphabetic character, i.e. it is
/// a name rather than a numeric literal and worth resolving.
#[must_use]
pub(crate) fn has_alphabetic(host: &str) -> bool {
    host.chars().any(|ch| ch.is_ascii_alphabetic())
}
