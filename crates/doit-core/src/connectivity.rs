//! Online/offline detection.
//!
//! `Connectivity::is_online` is a flag read and never touches the network.
//! `ConnectivityMonitor` keeps that flag current: `refresh` opens a TCP
//! connection to the API host, bounded as a whole (lookup included) by the
//! configured timeout. The user can also force offline mode, which wins over
//! the last check result.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tokio::net::TcpStream;
use tracing::debug;

/// Reports whether the network is currently reachable.
pub trait Connectivity: Send + Sync {
    fn is_online(&self) -> bool;
}

/// Always reports the same answer.
#[derive(Debug, Clone, Copy)]
pub struct FixedConnectivity(pub bool);

impl Connectivity for FixedConnectivity {
    fn is_online(&self) -> bool {
        self.0
    }
}

/// TCP reachability check against the API host.
#[derive(Debug, Clone)]
pub struct HostCheck {
    host: String,
    port: u16,
    timeout: Duration,
}

impl HostCheck {
    pub fn new(host: impl Into<String>, port: u16, timeout: Duration) -> Self {
        Self {
            host: host.into(),
            port,
            timeout,
        }
    }

    /// Check the host of `url` on its (default) port. None if the URL has no host.
    pub fn for_url(url: &str, timeout: Duration) -> Option<Self> {
        let parsed = reqwest::Url::parse(url).ok()?;
        let host = parsed.host_str()?.to_string();
        let port = parsed.port_or_known_default()?;
        Some(Self::new(host, port, timeout))
    }

    pub fn target(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Try to connect. Host lookup and connect share one deadline.
    pub async fn run(&self) -> bool {
        let connect = TcpStream::connect((self.host.as_str(), self.port));
        let reachable = match tokio::time::timeout(self.timeout, connect).await {
            Ok(Ok(_)) => true,
            Ok(Err(e)) => {
                debug!(target = %self.target(), error = %e, "Connect failed");
                false
            }
            Err(_) => {
                debug!(target = %self.target(), timeout_ms = self.timeout.as_millis() as u64, "Connect timed out");
                false
            }
        };
        debug!(target = %self.target(), reachable, "Connectivity check");
        reachable
    }
}

/// Forced-offline switch layered over the last check result.
pub struct ConnectivityMonitor {
    forced_offline: AtomicBool,
    reachable: AtomicBool,
    /// None when the API URL has no usable host; reachability then stays true
    check: Option<HostCheck>,
}

impl ConnectivityMonitor {
    /// Reachability is assumed until the first `refresh`.
    pub fn new(check: Option<HostCheck>, forced_offline: bool) -> Self {
        Self {
            forced_offline: AtomicBool::new(forced_offline),
            reachable: AtomicBool::new(true),
            check,
        }
    }

    pub fn set_forced_offline(&self, offline: bool) {
        self.forced_offline.store(offline, Ordering::Relaxed);
    }

    pub fn is_forced_offline(&self) -> bool {
        self.forced_offline.load(Ordering::Relaxed)
    }

    /// Re-check the API host and return the updated online state.
    ///
    /// Skips the check while forced offline.
    pub async fn refresh(&self) -> bool {
        if self.is_forced_offline() {
            return false;
        }
        if let Some(ref check) = self.check {
            let reachable = check.run().await;
            self.reachable.store(reachable, Ordering::Relaxed);
        }
        self.is_online()
    }
}

impl Connectivity for ConnectivityMonitor {
    fn is_online(&self) -> bool {
        !self.is_forced_offline() && self.reachable.load(Ordering::Relaxed)
    }
}
