// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Reachability probes.

use std::future::Future;
use std::io::ErrorKind;
use std::time::Duration;

use tokio::net::TcpStream;

use super::Reachability;
use crate::error::ProbeError;

/// Default port probed when the target carries none.
const DEFAULT_PORT: u16 = 80;

/// Default time allowed for one connection attempt.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(1);

/// A reachability primitive.
///
/// Implementations may take as long as they need; the monitor never starts a
/// new probe before the previous one has completed.
pub trait Probe: Send + Sync + 'static {
    /// Probes `target` once.
    ///
    /// # Errors
    ///
    /// Returns `ProbeError` if the probe could not be carried out. The monitor
    /// treats any error as [`Reachability::Down`].
    fn probe(&self, target: &str)
    -> impl Future<Output = Result<Reachability, ProbeError>> + Send;
}

/// Probes a host by opening a TCP connection.
///
/// A completed handshake and an active refusal both prove the host is up.
/// A timeout, unreachable network or any other I/O error reads as down.
///
/// The target is either `host:port` or a bare `host`, in which case
/// [`port`](Self::with_port) is used.
#[derive(Debug, Clone)]
pub struct TcpProbe {
    port: u16,
    timeout: Duration,
}

impl TcpProbe {
    /// Creates a probe on port 80 with a one second timeout.
    #[must_use]
    pub fn new() -> Self {
        Self {
            port: DEFAULT_PORT,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Sets the port used for targets without one.
    #[must_use]
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Sets the connection timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn address(&self, target: &str) -> Result<String, ProbeError> {
        let target = target.trim();
        if target.is_empty() {
            return Err(ProbeError::InvalidAddress(target.to_string()));
        }

        // Bracketed IPv6 or host:port pass through untouched
        if target.starts_with('[') || target.parse::<std::net::SocketAddr>().is_ok() {
            return Ok(target.to_string());
        }
        if target.parse::<std::net::Ipv6Addr>().is_ok() {
            return Ok(format!("[{target}]:{}", self.port));
        }
        match target.rsplit_once(':') {
            Some((host, port)) if !host.is_empty() && port.parse::<u16>().is_ok() => {
                Ok(target.to_string())
            }
            Some(_) => Err(ProbeError::InvalidAddress(target.to_string())),
            None => Ok(format!("{target}:{}", self.port)),
        }
    }
}

impl Default for TcpProbe {
    fn default() -> Self {
        Self::new()
    }
}

impl Probe for TcpProbe {
    async fn probe(&self, target: &str) -> Result<Reachability, ProbeError> {
        let address = self.address(target)?;

        match tokio::time::timeout(self.timeout, TcpStream::connect(&address)).await {
            Ok(Ok(_stream)) => Ok(Reachability::Up),
            Ok(Err(e)) if e.kind() == ErrorKind::ConnectionRefused => Ok(Reachability::Up),
            Ok(Err(e)) => Err(ProbeError::Io(e)),
            Err(_) => Err(ProbeError::Timeout(
                u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX),
            )),
        }
    }
}
