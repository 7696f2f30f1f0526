//! Per-user navigation context
//!
//! Holds the last narrator a user selected, used only as a fallback
//! when a title payload omits the narrator. Process-local and bounded
//! by a TTL sweep, not persisted; lost on restart by design since the
//! callback payloads carry enough state to recover.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

const DEFAULT_TTL: Duration = Duration::from_secs(12 * 60 * 60);

struct Entry {
    narrator: String,
    touched: Instant,
}

/// Keyed store of per-user navigation context
#[derive(Clone)]
pub struct NavigationContexts {
    inner: Arc<Mutex<HashMap<u64, Entry>>>,
    ttl: Duration,
}

impl Default for NavigationContexts {
    fn default() -> Self {
        Self::with_ttl(DEFAULT_TTL)
    }
}

impl NavigationContexts {
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            inner: Arc::new(Mutex::new(HashMap::new())),
            ttl,
        }
    }

    /// Record the narrator a user selected, evicting stale entries.
    pub fn set_narrator(&self, user_id: u64, narrator: &str) {
        let mut map = self.inner.lock().unwrap();
        let now = Instant::now();
        map.retain(|_, e| now.duration_since(e.touched) < self.ttl);
        map.insert(
            user_id,
            Entry {
                narrator: narrator.to_string(),
                touched: now,
            },
        );
    }

    /// Last narrator the user selected, if still fresh.
    pub fn narrator(&self, user_id: u64) -> Option<String> {
        let map = self.inner.lock().unwrap();
        let entry = map.get(&user_id)?;
        if entry.touched.elapsed() >= self.ttl {
            return None;
        }
        Some(entry.narrator.clone())
    }
}
