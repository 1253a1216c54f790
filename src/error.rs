//! Errors raised while synthesizing an API document.
//!
//! Synthesis is all-or-nothing: any of these aborts the build for the
//! requested endpoint and nothing is cached.

use std::path::PathBuf;
use thiserror::Error;

/// Failure while turning routes and handler fragments into a document.
#[derive(Debug, Error)]
pub enum SwaggerError {
    /// A verb is declared on a route but no handler could be located for it.
    #[error("cannot detect view function for rule {rule} ({verb})")]
    MissingHandler { rule: String, verb: String },

    /// The requested documentation endpoint is not part of the configured specs.
    #[error("can't find specs by endpoint [{0}], check your swagger configs")]
    UnknownEndpoint(String),

    /// The YAML section of a handler docstring could not be parsed.
    #[error("invalid docstring yaml for {endpoint} {verb}: {source}")]
    Docstring {
        endpoint: String,
        verb: String,
        #[source]
        source: serde_yaml::Error,
    },

    /// The parsed fragment does not have the shape of an operation.
    #[error("malformed documentation fragment for {endpoint} {verb}: {source}")]
    Fragment {
        endpoint: String,
        verb: String,
        #[source]
        source: serde_json::Error,
    },

    /// A handler documentation file under `doc_dir` exists but could not be read.
    #[error("failed to read doc file {}: {source}", .path.display())]
    DocFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Convenience alias used across the synthesis pipeline.
pub type Result<T, E = SwaggerError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_offender() {
        let err = SwaggerError::MissingHandler {
            rule: "/users/<int:id>".to_string(),
            verb: "GET".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "cannot detect view function for rule /users/<int:id> (GET)"
        );

        let err = SwaggerError::UnknownEndpoint("apispec_9".to_string());
        assert!(err.to_string().contains("[apispec_9]"));
    }
}
