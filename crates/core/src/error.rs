use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    /// A requested option (provider, model, duration...) is not in its allow-list.
    #[error("Unsupported {kind} '{value}'. Valid options: {}", valid.join(", "))]
    Unsupported {
        kind: &'static str,
        value: String,
        valid: Vec<String>,
    },

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Build an [`CoreError::Unsupported`] from any iterable of valid names.
    pub fn unsupported<I, S>(kind: &'static str, value: impl Into<String>, valid: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: ToString,
    {
        Self::Unsupported {
            kind,
            value: value.into(),
            valid: valid.into_iter().map(|v| v.to_string()).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsupported_message_lists_valid_options() {
        let err = CoreError::unsupported("provider", "acme", ["fal", "replicate"]);
        assert_eq!(
            err.to_string(),
            "Unsupported provider 'acme'. Valid options: fal, replicate"
        );
    }
}
