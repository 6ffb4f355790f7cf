//! Stable client identifier derived from host signals.

use chrono::Local;
use sha2::{Digest, Sha256};

use crate::error::DashboardError;
use crate::storage::{KeyValueStore, CLIENT_ID_KEY};

/// Environment signals hashed into the client identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostSignals {
    pub os: String,
    pub arch: String,
    pub user: String,
    pub host: String,
    pub locale: String,
    pub parallelism: usize,
    /// Local offset from UTC in minutes.
    pub utc_offset_minutes: i32,
}

impl HostSignals {
    /// Collects signals from the running process. Missing values become empty.
    pub fn collect() -> Self {
        let var = |keys: &[&str]| {
            keys.iter()
                .find_map(|k| std::env::var(k).ok())
                .unwrap_or_default()
        };
        Self {
            os: std::env::consts::OS.to_string(),
            arch: std::env::consts::ARCH.to_string(),
            user: var(&["USER", "USERNAME"]),
            host: var(&["HOSTNAME", "COMPUTERNAME"]),
            locale: var(&["LC_ALL", "LANG"]),
            parallelism: std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(0),
            utc_offset_minutes: Local::now().offset().local_minus_utc() / 60,
        }
    }

    /// Hashes the signals into a short base-36 string.
    pub fn fingerprint(&self) -> String {
        let joined = format!(
            "{}|{}|{}|{}|{}|{}|{}",
            self.os,
            self.arch,
            self.user,
            self.host,
            self.locale,
            self.parallelism,
            self.utc_offset_minutes
        );
        let digest = Sha256::digest(joined.as_bytes());
        let mut head = [0u8; 8];
        head.copy_from_slice(&digest[..8]);
        to_base36(u64::from_be_bytes(head))
    }
}

/// Returns the persisted client identifier, generating and storing one on
/// first use.
pub fn client_id(store: &dyn KeyValueStore) -> Result<String, DashboardError> {
    if let Some(id) = store.get(CLIENT_ID_KEY).filter(|id| !id.is_empty()) {
        return Ok(id);
    }
    let id = HostSignals::collect().fingerprint();
    store.set(CLIENT_ID_KEY, &id)?;
    tracing::debug!("Generated client id {}", id);
    Ok(id)
}

fn to_base36(mut n: u64) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if n == 0 {
        return "0".to_string();
    }
    let mut out = Vec::new();
    while n > 0 {
        out.push(DIGITS[(n % 36) as usize]);
        n /= 36;
    }
    out.reverse();
    String::from_utf8(out).unwrap_or_default()
}
