use thiserror::Error;

#[derive(Error, Debug)]
pub enum MemberQueryError {
    #[error("Config error: {0}")]
    Config(String),
    #[error("Persistence error: {0}")]
    Persistence(String),
    #[error("No row matched a query that required exactly one")]
    NotFound,
    #[error("Expected at most one row but the query matched several")]
    NonUnique,
    #[error("Search has no criteria; request a page instead of every row")]
    Unconstrained,
    #[error("Invalid search condition: {0}")]
    InvalidCondition(String),
    #[error("Lock poisoned: {0}")]
    Lock(String),
}

pub type Result<T> = std::result::Result<T, MemberQueryError>;

// Helper conversions
impl From<rusqlite::Error> for MemberQueryError {
    fn from(e: rusqlite::Error) -> Self {
        Self::Persistence(e.to_string())
    }
}
impl From<config::ConfigError> for MemberQueryError {
    fn from(e: config::ConfigError) -> Self {
        Self::Config(e.to_string())
    }
}
impl From<serde_json::Error> for MemberQueryError {
    fn from(e: serde_json::Error) -> Self {
        Self::InvalidCondition(e.to_string())
    }
}
