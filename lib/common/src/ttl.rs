use std::time::Instant;

/// A time-to-live in seconds; `0` means infinite (§6 "`ttl` of 0 means
/// infinite").
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ttl(u64);

impl Ttl {
    /// The sentinel TTL that never expires.
    pub const INFINITE: Self = Self(0);

    #[must_use]
    pub const fn from_secs(secs: u64) -> Self {
        Self(secs)
    }

    #[must_use]
    pub const fn is_infinite(self) -> bool {
        self.0 == 0
    }

    #[must_use]
    pub const fn as_secs(self) -> u64 {
        self.0
    }

    /// Resolves this TTL against a clock reading into an [`Expiry`].
    #[must_use]
    pub fn expiry_from(self, now: Instant) -> Expiry {
        if self.is_infinite() {
            Expiry::Never
        } else {
            Expiry::At(now + std::time::Duration::from_secs(self.0))
        }
    }
}

impl From<u64> for Ttl {
    fn from(secs: u64) -> Self {
        Self::from_secs(secs)
    }
}

/// An absolute expiration time, or the sentinel that never expires
/// (§4.6 "SENTINEL_NEVER is treated as infinity").
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Expiry {
    Never,
    At(Instant),
}

impl Expiry {
    /// `true` if this expiry has already passed as of `now`.
    #[must_use]
    pub fn is_expired(self, now: Instant) -> bool {
        match self {
            Self::Never => false,
            Self::At(at) => at <= now,
        }
    }

    /// The earlier of two expiries — `Never` only if both are `Never`
    /// (§3 "`expiresAt` is the minimum of all TTLs that contributed").
    #[must_use]
    pub fn min(self, other: Self) -> Self {
        match (self, other) {
            (Self::Never, other) | (other, Self::Never) => other,
            (Self::At(a), Self::At(b)) => Self::At(a.min(b)),
        }
    }
}
