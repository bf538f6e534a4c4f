//! Error types for the roster engine.
//!
//! Infeasibility is deliberately not represented here: a solver that finds no
//! schedule is a normal outcome (`SolveResult { feasible: false, .. }`), not a
//! failure of the engine itself. The backend collapses "no solution" and
//! "rejected model" into the same `Err` case, so there is no separate
//! backend-fault variant to distinguish them by; these variants cover
//! malformed inputs only.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RosterError {
    #[error("employee '{id}' is invalid: {reason}")]
    InvalidEmployee { id: String, reason: String },

    #[error("shift '{code}' is invalid: {reason}")]
    InvalidShift { code: String, reason: String },

    #[error("unrecognized contract type label: '{0}'")]
    UnknownContractType(String),

    #[error("unrecognized group label: '{0}'")]
    UnknownGroup(String),

    #[error("invalid month string: '{0}' (expected \"YYYY-MM\")")]
    InvalidMonth(String),

    #[error("shift catalog is missing a required category: {0}")]
    CatalogShape(String),
}
