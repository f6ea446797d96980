use rand::{Rng, SeedableRng, rngs::StdRng};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::time::{Duration, Instant};

use super::CorrelationError;

/// Handle returned by a finished real-identity registration and presented
/// again by the management-slot registration that completes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CorrelationToken(u128);

impl fmt::Display for CorrelationToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:032x}", self.0)
    }
}

impl std::str::FromStr for CorrelationToken {
    type Err = CorrelationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // from_str_radix alone would also take a leading sign
        if s.len() != 32 || !s.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(CorrelationError::MalformedToken);
        }
        u128::from_str_radix(s, 16)
            .map(Self)
            .map_err(|_| CorrelationError::MalformedToken)
    }
}

#[derive(Debug, Clone)]
pub struct PendingCorrelation {
    pub user: String,
    pub created: Instant,
}

/// Real identities waiting for their management-slot registration.
pub struct PendingTable {
    entries: HashMap<CorrelationToken, PendingCorrelation>,
    max_pending: usize,
    timeout: Duration,
    rng: StdRng,
}

impl PendingTable {
    pub fn new(max_pending: usize, timeout: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            max_pending,
            timeout,
            rng: StdRng::from_entropy(),
        }
    }

    /// Fail early when no new entry could be allocated.
    pub fn ensure_capacity(&mut self) -> Result<(), CorrelationError> {
        self.reap_expired();
        if self.entries.len() >= self.max_pending {
            return Err(CorrelationError::TooManyPending);
        }
        Ok(())
    }

    pub fn allocate(&mut self, user: &str) -> Result<CorrelationToken, CorrelationError> {
        self.ensure_capacity()?;
        loop {
            let token = CorrelationToken(self.rng.r#gen());
            if !self.entries.contains_key(&token) {
                self.entries.insert(
                    token,
                    PendingCorrelation {
                        user: user.to_string(),
                        created: Instant::now(),
                    },
                );
                return Ok(token);
            }
        }
    }

    pub fn get(&mut self, token: &CorrelationToken) -> Result<&PendingCorrelation, CorrelationError> {
        self.reap_expired();
        self.entries
            .get(token)
            .ok_or(CorrelationError::NoPendingCorrelation)
    }

    /// Remove the entry regardless of its age.
    pub fn take(&mut self, token: &CorrelationToken) -> Result<PendingCorrelation, CorrelationError> {
        self.entries
            .remove(token)
            .ok_or(CorrelationError::NoPendingCorrelation)
    }

    pub fn reap_expired(&mut self) {
        let timeout = self.timeout;
        let before = self.entries.len();
        self.entries.retain(|token, entry| {
            let live = entry.created.elapsed() < timeout;
            if !live {
                tracing::warn!(token = %token, user = %entry.user, "Pending correlation expired");
            }
            live
        });
        if self.entries.len() != before {
            tracing::debug!(remaining = self.entries.len(), "Reaped pending correlations");
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
