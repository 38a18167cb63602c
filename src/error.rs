//! Error types for the fallible edges of the engine.
//!
//! The per-tick simulation and the reward selectors never fail: stale ids are
//! skipped and exhausted pools degrade to safe defaults. Errors only surface when
//! loading data tables or when an equip mutator is asked to break an invariant
//! (a weapon past the slot limit, a duplicate weapon, a level past the cap).

use thiserror::Error;

/// Top-level error enum for the arena simulation.
#[derive(Debug, Error)]
pub enum SimError {
    /// A weapon id was referenced that the catalog does not contain.
    #[error("unknown weapon '{0}'")]
    UnknownWeapon(String),

    /// The weapon is already equipped (one instance per weapon id).
    #[error("weapon '{0}' is already equipped")]
    AlreadyEquipped(String),

    /// Every weapon slot is occupied.
    #[error("no free weapon slot ({max} slots in use)")]
    NoFreeSlot {
        /// Number of slots available.
        max: usize,
    },

    /// The weapon is not equipped, so it cannot be upgraded.
    #[error("weapon '{0}' is not equipped")]
    NotEquipped(String),

    /// The weapon has already reached the level cap.
    #[error("weapon '{id}' is already at max level {max}")]
    MaxLevel {
        /// Weapon id.
        id: String,
        /// Level cap.
        max: u32,
    },

    /// A catalog entry failed validation.
    #[error("invalid definition '{id}': {reason}")]
    InvalidDefinition {
        /// Offending weapon or boon id.
        id: String,
        /// Human-readable description of the problem.
        reason: String,
    },

    /// A JSON table or settings file could not be parsed.
    #[error("failed to parse {what}: {source}")]
    Parse {
        /// What was being parsed (for logging).
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// A file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        /// Path that was being read.
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Convenience alias: a `Result` using `SimError` as the error type.
pub type SimResult<T> = Result<T, SimError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = SimError::NoFreeSlot { max: 4 };
        assert_eq!(err.to_string(), "no free weapon slot (4 slots in use)");

        let err = SimError::MaxLevel {
            id: "LASER_FRONT".to_string(),
            max: 9,
        };
        assert!(err.to_string().contains("LASER_FRONT"));
    }

    #[test]
    fn test_parse_error_keeps_source() {
        let source = serde_json::from_str::<u32>("not json").unwrap_err();
        let err = SimError::Parse {
            what: "weapon catalog",
            source,
        };
        assert!(std::error::Error::source(&err).is_some());
    }
}
