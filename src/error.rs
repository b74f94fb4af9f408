use std::time::Duration;

/// Failures talking to the completion provider. All of them surface to the
/// caller as a generic upstream failure.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("provider request timed out after {0:?}")]
    Timeout(Duration),
    #[error("provider transport error: {0}")]
    Transport(String),
    #[error("provider returned HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("provider response was not a chat completion: {0}")]
    Protocol(String),
}

/// A single problem with an incoming profile.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ProfileError {
    #[error("name must not be empty")]
    EmptyName,
    #[error("age must be a positive integer")]
    NonPositiveAge,
    #[error("{field} must be a positive number, got {value}")]
    NonPositive { field: &'static str, value: f64 },
}

#[derive(Debug, thiserror::Error)]
pub enum PlanError {
    #[error("invalid profile: {}", join_profile_errors(.0))]
    InvalidProfile(Vec<ProfileError>),
    #[error("upstream failure: {0}")]
    Upstream(#[from] ProviderError),
}

fn join_profile_errors(errors: &[ProfileError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
