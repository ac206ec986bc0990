//! Domain-level error taxonomy for gitcrew.

use crate::github::GithubError;

/// gitcrew domain errors.
#[derive(Debug, thiserror::Error)]
pub enum GitcrewError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("github error: {0}")]
    Github(#[from] GithubError),

    #[error("specification parse error: {0}")]
    SpecParse(#[from] serde_yaml::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for gitcrew domain operations.
pub type Result<T> = std::result::Result<T, GitcrewError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display() {
        let err = GitcrewError::Config("GITHUB_TOKEN is not set".to_string());
        assert!(err.to_string().contains("configuration error"));
        assert!(err.to_string().contains("GITHUB_TOKEN"));
    }
}
