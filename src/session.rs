//! # Session Module
//!
//! File-backed sessions: one JSON document per session id, expired by file
//! age against the configured lifetime. Sessions carry arbitrary values,
//! flash values (read-once, `_flash_` key prefix) and the per-session CSRF
//! token.
//!
//! Session data is the only state that survives a request; everything else
//! in the process is read-only after startup.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::warn;

const FLASH_PREFIX: &str = "_flash_";
const CSRF_KEY: &str = "_csrf_token";

/// In-memory view of one session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    /// Opaque session identifier, also the cookie value
    pub id: String,
    values: BTreeMap<String, Value>,
    /// True when the id was generated for this request (cookie must be set)
    #[serde(skip)]
    fresh: bool,
    /// True once a value was written or removed during this request
    #[serde(skip)]
    dirty: bool,
}

impl Session {
    fn new(id: String) -> Self {
        Session {
            id,
            values: BTreeMap::new(),
            fresh: true,
            dirty: false,
        }
    }

    /// True when this session was created during the current request.
    #[must_use]
    pub fn is_fresh(&self) -> bool {
        self.fresh
    }

    /// True when the session changed during the current request. Fresh
    /// sessions that were never written to stay clean and need no file or
    /// cookie.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Read a value.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Store a value.
    pub fn set(&mut self, key: &str, value: Value) {
        self.values.insert(key.to_string(), value);
        self.dirty = true;
    }

    /// Flash a value for the next read.
    pub fn flash(&mut self, key: &str, value: Value) {
        self.values.insert(format!("{FLASH_PREFIX}{key}"), value);
        self.dirty = true;
    }

    /// Take a flashed value, removing it from the session.
    pub fn flash_get(&mut self, key: &str) -> Option<Value> {
        let value = self.values.remove(&format!("{FLASH_PREFIX}{key}"));
        if value.is_some() {
            self.dirty = true;
        }
        value
    }

    /// True if a flashed value is pending for the key.
    #[must_use]
    pub fn has_flash(&self, key: &str) -> bool {
        self.values.contains_key(&format!("{FLASH_PREFIX}{key}"))
    }

    /// The session's CSRF token, generated on first use.
    pub fn csrf_token(&mut self) -> String {
        if let Some(Value::String(token)) = self.values.get(CSRF_KEY) {
            return token.clone();
        }
        let token = random_token();
        self.values
            .insert(CSRF_KEY.to_string(), Value::String(token.clone()));
        self.dirty = true;
        token
    }

    /// Verify a submitted CSRF token in constant time.
    #[must_use]
    pub fn verify_csrf(&self, token: &str) -> bool {
        match self.values.get(CSRF_KEY) {
            Some(Value::String(expected)) => constant_time_eq(expected.as_bytes(), token.as_bytes()),
            _ => false,
        }
    }
}

/// Directory of session files plus the expiry policy.
#[derive(Debug, Clone)]
pub struct SessionStore {
    dir: PathBuf,
    lifetime: Duration,
}

impl SessionStore {
    /// Create the store, making the directory if needed. Session files
    /// already past their lifetime are swept on creation.
    pub fn new(dir: impl AsRef<Path>, lifetime_mins: u64) -> io::Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        let store = SessionStore {
            dir,
            lifetime: Duration::from_secs(lifetime_mins * 60),
        };
        store.sweep();
        Ok(store)
    }

    /// Open the session for the given cookie id, or start a fresh one.
    ///
    /// An invalid id, a missing file, an expired file or an unreadable file
    /// all yield a fresh session with a newly generated id.
    #[must_use]
    pub fn open(&self, id: Option<&str>) -> Session {
        let Some(id) = id.filter(|i| valid_id(i)) else {
            return Session::new(random_token());
        };

        let path = self.path(id);
        if self.expired(&path) {
            let _ = fs::remove_file(&path);
            return Session::new(random_token());
        }

        match fs::read(&path) {
            Ok(bytes) => match serde_json::from_slice::<Session>(&bytes) {
                Ok(session) => session,
                Err(e) => {
                    warn!(session_id = %id, error = %e, "Discarding corrupt session file");
                    Session::new(random_token())
                }
            },
            // An unknown id never becomes a session id: adopting it would
            // let a client fix its own session identifier
            Err(_) => Session::new(random_token()),
        }
    }

    /// Persist the session to its file.
    ///
    /// Occasionally sweeps expired session files as a side effect, in the
    /// manner of probabilistic session garbage collection.
    pub fn save(&self, session: &Session) -> io::Result<()> {
        let bytes = serde_json::to_vec(session).map_err(io::Error::other)?;
        fs::write(self.path(&session.id), bytes)?;
        // Roughly 1 in 32 saves
        if rand::random::<u8>() < 8 {
            self.sweep();
        }
        Ok(())
    }

    /// Delete every session file past its lifetime.
    pub fn sweep(&self) {
        let Ok(entries) = fs::read_dir(&self.dir) else {
            return;
        };
        for entry in entries.flatten() {
            let path = entry.path();
            let is_session_file = path
                .file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.starts_with("sess_"));
            if is_session_file && self.expired(&path) {
                let _ = fs::remove_file(&path);
            }
        }
    }

    fn path(&self, id: &str) -> PathBuf {
        self.dir.join(format!("sess_{id}.json"))
    }

    fn expired(&self, path: &Path) -> bool {
        fs::metadata(path)
            .and_then(|m| m.modified())
            .ok()
            .and_then(|mtime| mtime.elapsed().ok())
            .map(|age| age > self.lifetime)
            .unwrap_or(false)
    }
}

/// 32 random bytes, URL-safe base64 without padding.
fn random_token() -> String {
    let bytes: [u8; 32] = rand::random();
    URL_SAFE_NO_PAD.encode(bytes)
}

fn valid_id(id: &str) -> bool {
    !id.is_empty()
        && id.len() <= 64
        && id
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
