/// Rule store errors.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("weight out of range [0, 1]: {value}")]
    InvalidWeight { value: f64 },

    #[error("rule id is empty")]
    EmptyRuleId,

    #[error("rule {id} version {attempted} is older than stored version {stored}")]
    StaleVersion {
        id: String,
        attempted: u32,
        stored: u32,
    },

    #[error("rule not found: {id}")]
    RuleNotFound { id: String },

    #[error("sqlite failure: {reason}")]
    Sqlite { reason: String },

    #[error("migration failed: {reason}")]
    Migration { reason: String },
}
