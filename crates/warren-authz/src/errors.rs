use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthzError {
    #[error("invalid permission: {0}")]
    InvalidPermission(String),
    #[error("invalid resource kind: {0}")]
    InvalidResource(String),
    #[error("invalid {section} rule #{index}: {reason}")]
    InvalidRule {
        section: &'static str,
        index: usize,
        reason: String,
    },
    #[error("invalid routing key pattern {pattern}: {source}")]
    InvalidRoutingKeyPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
    #[error("routing key must set exactly one of topic or regex")]
    AmbiguousRoutingKey,
}

pub type AuthzResult<T> = Result<T, AuthzError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_variants() {
        let errors = vec![
            AuthzError::InvalidPermission("bad".to_string()),
            AuthzError::InvalidResource("bad".to_string()),
            AuthzError::InvalidRule {
                section: "users",
                index: 0,
                reason: "missing password".to_string(),
            },
            AuthzError::InvalidRoutingKeyPattern {
                pattern: "(".to_string(),
                source: regex::Regex::new("(").expect_err("unbalanced group"),
            },
            AuthzError::AmbiguousRoutingKey,
        ];

        for error in errors {
            let rendered = error.to_string();
            assert!(!rendered.is_empty());
        }
    }

    #[test]
    fn invalid_rule_names_section_and_index() {
        let err = AuthzError::InvalidRule {
            section: "topics",
            index: 3,
            reason: "permissions must not be empty".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "invalid topics rule #3: permissions must not be empty"
        );
    }
}
