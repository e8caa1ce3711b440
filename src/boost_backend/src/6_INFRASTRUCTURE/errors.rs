//! Error taxonomy for the boost backend
//!
//! Ledger and oracle failures are reported through `QueryError` and absorbed
//! by the breakdown combiner. Only admin endpoints and the preview query ever
//! hand a `BoostError` back to a caller.

use candid::{CandidType, Deserialize};
use serde::Serialize;
use std::fmt;

pub type Result<T> = std::result::Result<T, BoostError>;

#[derive(CandidType, Deserialize, Serialize, Debug, Clone, PartialEq)]
pub enum BoostError {
    Query(QueryError),
    Validation(ValidationError),
    Calculation(CalculationError),
    Unauthorized { principal: String },
    Other(String),
}

#[derive(CandidType, Deserialize, Serialize, Debug, Clone, PartialEq)]
pub enum QueryError {
    CanisterUnreachable { canister: String, reason: String },
    Timeout { operation: String, seconds: u64 },
    MalformedResponse { method: String, reason: String },
}

#[derive(CandidType, Deserialize, Serialize, Debug, Clone, PartialEq)]
pub enum ValidationError {
    InvalidAmount { amount: String, reason: String },
    InvalidPrincipal { principal: String },
    InvalidConfig { field: String, reason: String },
}

#[derive(CandidType, Deserialize, Serialize, Debug, Clone, PartialEq)]
pub enum CalculationError {
    Overflow { operation: String },
    ConversionFailed { value: String, reason: String },
}

impl fmt::Display for BoostError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoostError::Query(e) => write!(f, "Query error: {}", e),
            BoostError::Validation(e) => write!(f, "Validation error: {}", e),
            BoostError::Calculation(e) => write!(f, "Calculation error: {}", e),
            BoostError::Unauthorized { principal } => {
                write!(f, "Authorization failed: {} is not a controller", principal)
            }
            BoostError::Other(msg) => write!(f, "{}", msg),
        }
    }
}

impl fmt::Display for QueryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryError::CanisterUnreachable { canister, reason } => {
                write!(f, "canister {} unreachable: {}", canister, reason)
            }
            QueryError::Timeout { operation, seconds } => {
                write!(f, "{} timed out after {}s", operation, seconds)
            }
            QueryError::MalformedResponse { method, reason } => {
                write!(f, "malformed response from {}: {}", method, reason)
            }
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::InvalidAmount { amount, reason } => {
                write!(f, "invalid amount {}: {}", amount, reason)
            }
            ValidationError::InvalidPrincipal { principal } => {
                write!(f, "invalid principal {}", principal)
            }
            ValidationError::InvalidConfig { field, reason } => {
                write!(f, "invalid config field {}: {}", field, reason)
            }
        }
    }
}

impl fmt::Display for CalculationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CalculationError::Overflow { operation } => write!(f, "overflow in {}", operation),
            CalculationError::ConversionFailed { value, reason } => {
                write!(f, "cannot convert {}: {}", value, reason)
            }
        }
    }
}

impl std::error::Error for BoostError {}

impl From<QueryError> for BoostError {
    fn from(e: QueryError) -> Self {
        BoostError::Query(e)
    }
}

impl From<ValidationError> for BoostError {
    fn from(e: ValidationError) -> Self {
        BoostError::Validation(e)
    }
}

impl From<CalculationError> for BoostError {
    fn from(e: CalculationError) -> Self {
        BoostError::Calculation(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_display() {
        let err = BoostError::Query(QueryError::Timeout {
            operation: "staking.get_position".to_string(),
            seconds: 10,
        });
        assert_eq!(err.to_string(), "Query error: staking.get_position timed out after 10s");
    }

    #[test]
    fn test_from_nested_error() {
        let err: BoostError = CalculationError::Overflow { operation: "sum".to_string() }.into();
        assert!(matches!(err, BoostError::Calculation(CalculationError::Overflow { .. })));
    }
}
