use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum PlanError {
    #[error("retirementAge ({retirement_age}) must be greater than currentAge ({current_age})")]
    RetirementNotAfterCurrentAge {
        current_age: u32,
        retirement_age: u32,
    },

    #[error(
        "lifeExpectancy ({life_expectancy}) must be greater than retirementAge ({retirement_age})"
    )]
    LifeExpectancyNotAfterRetirement {
        retirement_age: u32,
        life_expectancy: u32,
    },

    #[error("{field} ({age}) must not exceed {max}")]
    AgeOutOfRange {
        field: &'static str,
        age: u32,
        max: u32,
    },

    #[error("{field} must be a finite amount >= 0, got {value}")]
    NegativeAmount { field: &'static str, value: f64 },

    #[error("{field} must be finite and > -100, got {value}")]
    InvalidRate { field: &'static str, value: f64 },

    #[error("no ids left to assign")]
    IdsExhausted,

    #[error("no additional pot with id {0}")]
    UnknownPot(u32),

    #[error("no defined benefit pension with id {0}")]
    UnknownDbPension(u32),

    #[error("invalid {flag} value '{value}': {reason}")]
    InvalidFlag {
        flag: &'static str,
        value: String,
        reason: String,
    },

    #[error("serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for PlanError {
    fn from(e: serde_json::Error) -> Self {
        PlanError::Serialization(e.to_string())
    }
}
