//! Type-safe identifiers for the bridge.
//!
//! Newtype wrappers prevent mixing incompatible IDs at compile time.
//!
//! | Type | Purpose |
//! |------|---------|
//! | [`RequestId`] | Correlates a request with its response |
//! | [`SubscriptionId`] | Identifies one event subscription entry |

// ============================================================================
// Imports
// ============================================================================

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use uuid::Uuid;

// ============================================================================
// RequestId
// ============================================================================

/// Unique identifier correlating a request with its eventual response.
///
/// Generated fresh per outstanding request; collisions cannot occur while a
/// request is in flight. Serialized on the wire as 32 lowercase hex digits
/// (the format the Painter QML plugin echoes back), deserialized from any
/// UUID text representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestId(Uuid);

impl RequestId {
    /// Generates a fresh random request ID.
    #[inline]
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parses a request ID from its text form.
    ///
    /// Accepts both hyphenated and plain-hex UUID formats.
    pub fn parse(s: &str) -> Option<Self> {
        Uuid::parse_str(s).ok().map(Self)
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.simple())
    }
}

impl Serialize for RequestId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&self.0.simple())
    }
}

impl<'de> Deserialize<'de> for RequestId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Uuid::parse_str(&s)
            .map(Self)
            .map_err(serde::de::Error::custom)
    }
}

// ============================================================================
// SubscriptionId
// ============================================================================

/// Identifier for one entry in the event subscription table.
///
/// Returned inside a [`Subscription`](crate::transport::Subscription) handle
/// so that unsubscription removes exactly the entry it was issued for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    /// Creates a subscription ID from its raw counter value.
    #[inline]
    #[must_use]
    pub(crate) const fn new(raw: u64) -> Self {
        Self(raw)
    }
}

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sub-{}", self.0)
    }
}

// ============================================================================
// Tests
// ============================================================================
