//! Lifecycle action types derived from an entity name and suffix triple.

use crate::params::Suffixes;
use std::fmt;

/// One of the three phases of an HTTP operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Request issued, response pending
    Request,
    /// Response received
    Success,
    /// Call failed
    Failure,
}

impl Phase {
    /// All phases in request/success/failure order.
    pub const ALL: [Self; 3] = [Self::Request, Self::Success, Self::Failure];

    /// Position of the phase in a suffix triple.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Request => 0,
            Self::Success => 1,
            Self::Failure => 2,
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Request => write!(f, "request"),
            Self::Success => write!(f, "success"),
            Self::Failure => write!(f, "failure"),
        }
    }
}

/// Lowercase status tokens, one per phase.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatusTokens {
    /// Token of the request phase
    pub request: String,
    /// Token of the success phase
    pub success: String,
    /// Token of the failure phase
    pub failure: String,
}

impl StatusTokens {
    /// Lowercase each suffix.
    #[must_use]
    pub fn new(suffixes: &Suffixes) -> Self {
        Self {
            request: suffixes.get(Phase::Request).to_lowercase(),
            success: suffixes.get(Phase::Success).to_lowercase(),
            failure: suffixes.get(Phase::Failure).to_lowercase(),
        }
    }

    /// Token of the given phase.
    #[must_use]
    pub fn get(&self, phase: Phase) -> &str {
        match phase {
            Phase::Request => &self.request,
            Phase::Success => &self.success,
            Phase::Failure => &self.failure,
        }
    }
}

/// Action types and status tokens for one entity.
///
/// # Example
///
/// ```
/// use http_lifecycle_core::{LifecycleTypes, Suffixes};
///
/// let types = LifecycleTypes::new("user", &Suffixes::new("REQUEST", "SUCCESS", "FAILURE"));
/// assert_eq!(types.request, "USER_REQUEST");
/// assert_eq!(types.statuses.success, "success");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LifecycleTypes {
    /// `ENTITY_<suffix0>`
    pub request: String,
    /// `ENTITY_<suffix1>`
    pub success: String,
    /// `ENTITY_<suffix2>`
    pub failure: String,
    /// Lowercase suffixes
    pub statuses: StatusTokens,
}

impl LifecycleTypes {
    /// Build the types for `entity`.
    #[must_use]
    pub fn new(entity: &str, suffixes: &Suffixes) -> Self {
        let prefix = entity.to_uppercase();
        let type_for = |phase: Phase| format!("{prefix}_{}", suffixes.get(phase));

        Self {
            request: type_for(Phase::Request),
            success: type_for(Phase::Success),
            failure: type_for(Phase::Failure),
            statuses: StatusTokens::new(suffixes),
        }
    }

    /// Action type of the given phase.
    #[must_use]
    pub fn type_for(&self, phase: Phase) -> &str {
        match phase {
            Phase::Request => &self.request,
            Phase::Success => &self.success,
            Phase::Failure => &self.failure,
        }
    }
}
