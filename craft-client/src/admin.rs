//! Admin gate
//!
//! A single shared secret unlocks item management. Only its SHA-256
//! digest is kept in memory.

use std::sync::atomic::{AtomicBool, Ordering};

use sha2::{Digest, Sha256};
use shared::error::{AppError, AppResult, ErrorCode};

fn digest(secret: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(secret.as_bytes());
    hex::encode(hasher.finalize())
}

/// Boolean admin flag behind a shared secret
#[derive(Debug, Default)]
pub struct AdminGate {
    secret_digest: Option<String>,
    admin: AtomicBool,
}

impl AdminGate {
    /// Gate for the given secret. `None` (or an empty secret) locks the
    /// gate permanently.
    pub fn new(secret: Option<&str>) -> Self {
        Self {
            secret_digest: secret.filter(|s| !s.is_empty()).map(digest),
            admin: AtomicBool::new(false),
        }
    }

    /// Enable admin mode when the secret matches
    pub fn login(&self, secret: &str) -> bool {
        let ok = self
            .secret_digest
            .as_deref()
            .is_some_and(|expected| expected == digest(secret));
        if ok {
            self.admin.store(true, Ordering::Release);
            tracing::info!("Admin mode enabled");
        } else {
            tracing::warn!("Admin login rejected");
        }
        ok
    }

    pub fn logout(&self) {
        self.admin.store(false, Ordering::Release);
        tracing::info!("Admin mode disabled");
    }

    pub fn is_admin(&self) -> bool {
        self.admin.load(Ordering::Acquire)
    }

    /// Guard for admin-only actions
    pub fn require_admin(&self) -> AppResult<()> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(AppError::new(ErrorCode::AdminRequired))
        }
    }
}
