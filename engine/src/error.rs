use thiserror::Error;

/// Point allocation failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StatError {
    #[error("unknown stat `{0}` (expected hp, atk, def or spd)")]
    UnknownStat(String),
    #[error("no attribute points available")]
    NoPointsAvailable,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EquipError {
    #[error("`{0}` is not equipment")]
    NotEquipment(String),
}

/// Why a skill could not be used this turn.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SkillError {
    #[error("unknown skill `{0}`")]
    Unknown(String),
    #[error("skill `{name}` is cooling down ({remaining} turns left)")]
    OnCooldown { name: String, remaining: u32 },
}

#[derive(Debug, Error)]
pub enum ContentError {
    #[error("failed to parse {what}: {source}")]
    Parse {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("unknown enemy `{0}`")]
    UnknownEnemy(String),
    #[error("unknown item `{0}`")]
    UnknownItem(String),
}
