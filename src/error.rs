//! Error taxonomy for configuration and lookup failures
//!
//! Numeric state never errors (it is clamped); only invalid configuration,
//! lookups by unknown keys and save file failures reach the caller.

use std::fmt;

#[derive(Debug)]
pub enum SimError {
    /// A weapon was requested by a name that is not in the loadout
    UnknownWeapon(String),
    /// A bonus item action name did not match any known action
    UnknownBonusAction(String),
    /// A difficulty preset name did not match any known preset
    UnknownDifficulty(String),
    /// A catalog that must hold at least one entry is empty
    EmptyCatalog(&'static str),
    /// A blueprint index outside its catalog
    BlueprintOutOfRange { catalog: &'static str, index: usize, len: usize },
    /// A tuning value failed validation
    InvalidTuning { field: &'static str, reason: String },
    /// Tuning JSON could not be parsed or a snapshot could not be written
    Json(serde_json::Error),
    /// A save file could not be read or written
    Io(std::io::Error),
    /// A save file was written by an incompatible version
    UnsupportedSaveVersion(u32),
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownWeapon(name) => write!(f, "unknown weapon: {name:?}"),
            Self::UnknownBonusAction(name) => write!(f, "unknown bonus action: {name:?}"),
            Self::UnknownDifficulty(name) => write!(f, "unknown difficulty: {name:?}"),
            Self::EmptyCatalog(catalog) => write!(f, "{catalog} catalog is empty"),
            Self::BlueprintOutOfRange { catalog, index, len } => write!(
                f,
                "{catalog} blueprint index {index} out of range (catalog holds {len})"
            ),
            Self::InvalidTuning { field, reason } => {
                write!(f, "invalid tuning value for {field}: {reason}")
            }
            Self::Json(err) => write!(f, "json error: {err}"),
            Self::Io(err) => write!(f, "io error: {err}"),
            Self::UnsupportedSaveVersion(v) => write!(f, "unsupported save version {v}"),
        }
    }
}

impl std::error::Error for SimError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Json(err) => Some(err),
            Self::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for SimError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err)
    }
}

impl From<std::io::Error> for SimError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let err = SimError::UnknownWeapon("Laser".into());
        assert_eq!(err.to_string(), "unknown weapon: \"Laser\"");

        let err = SimError::BlueprintOutOfRange {
            catalog: "enemy",
            index: 4,
            len: 3,
        };
        assert!(err.to_string().contains("index 4"));
    }

    #[test]
    fn test_json_error_has_source() {
        let json_err = serde_json::from_str::<u32>("nope").unwrap_err();
        let err = SimError::from(json_err);
        assert!(std::error::Error::source(&err).is_some());
    }
}
