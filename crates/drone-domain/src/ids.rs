//! Identifier aliases. Drone IDs and pattern IDs are operator-assigned
//! strings (hardware callsigns, canonical catalog keys) — there is no
//! central ID authority to generate UUIDs from.

/// A drone's identifier, assigned at registration.
pub type DroneId = String;

/// A catalog entry's identifier — always equal to its [`crate::coordinate::CorePattern::canonical_key`].
pub type PatternId = String;
