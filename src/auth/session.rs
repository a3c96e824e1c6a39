use chrono::{DateTime, Duration, Utc};
use rand::{rngs::OsRng, RngCore};
use std::collections::HashMap;
use std::sync::RwLock;

use crate::auth::Principal;

/// Number of random bytes in a session identifier.
pub const SESSION_ID_BYTES: usize = 32;

#[derive(Debug, Clone)]
struct Session {
    principal: Principal,
    expires_at: DateTime<Utc>,
}

/// In-process session store. A session is valid only if this store created it,
/// it has not been destroyed, and its deadline has not passed; nothing about
/// validity is derived from what the client presents beyond the opaque id.
#[derive(Debug)]
pub struct SessionStore {
    ttl: Duration,
    sessions: RwLock<HashMap<String, Session>>,
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Create a session for a principal and return its opaque identifier.
    pub fn create(&self, principal: Principal) -> String {
        let id = generate_session_id();
        let now = Utc::now();

        let mut sessions = self.write_sessions();
        // Opportunistic sweep keeps the map bounded without a background task
        sessions.retain(|_, session| session.expires_at > now);
        sessions.insert(
            id.clone(),
            Session {
                principal,
                expires_at: now + self.ttl,
            },
        );

        id
    }

    /// Resolve a presented identifier to its principal. Expired sessions are
    /// removed on touch and resolve to nothing.
    pub fn resolve(&self, id: &str) -> Option<Principal> {
        let expired = {
            let sessions = self.read_sessions();
            match sessions.get(id) {
                Some(session) if session.expires_at > Utc::now() => {
                    return Some(session.principal.clone());
                }
                Some(_) => true,
                None => false,
            }
        };

        if expired {
            self.write_sessions().remove(id);
        }
        None
    }

    /// Invalidate a session. Returns whether it existed.
    pub fn destroy(&self, id: &str) -> bool {
        self.write_sessions().remove(id).is_some()
    }

    fn read_sessions(&self) -> std::sync::RwLockReadGuard<'_, HashMap<String, Session>> {
        self.sessions.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write_sessions(&self) -> std::sync::RwLockWriteGuard<'_, HashMap<String, Session>> {
        self.sessions.write().unwrap_or_else(|e| e.into_inner())
    }
}

/// 32 bytes from the OS RNG, hex encoded.
fn generate_session_id() -> String {
    let mut bytes = [0_u8; SESSION_ID_BYTES];
    OsRng.fill_bytes(&mut bytes);
    encode_hex(&bytes)
}

fn encode_hex(bytes: &[u8]) -> String {
    const HEX: &[u8; 16] = b"0123456789abcdef";

    let mut encoded = String::with_capacity(bytes.len() * 2);
    for byte in bytes {
        encoded.push(HEX[(byte >> 4) as usize] as char);
        encoded.push(HEX[(byte & 0x0f) as usize] as char);
    }

    encoded
}
