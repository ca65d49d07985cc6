//! Shared primitive types used across the planning engine.

/// A person's canonical identity name, as configured for the team.
pub type PersonId = String;

/// Position of a sprint within the generated horizon.
/// Negative for look-back sprints, zero and up for upcoming ones.
pub type SprintIndex = i32;
