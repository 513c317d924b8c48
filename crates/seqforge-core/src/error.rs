use thiserror::Error;

/// Core error type shared across seqforge crates.
#[derive(Debug, Error)]
pub enum Error {
    /// A required property is absent from a generator's property map.
    #[error("{context}: missing required property '{key}'")]
    MissingProperty { context: &'static str, key: String },
    /// A property is present but its value cannot be used.
    #[error("{context}: invalid value '{value}' for property '{key}': {reason}")]
    InvalidProperty {
        context: &'static str,
        key: String,
        value: String,
        reason: String,
    },
    /// The generator configuration violates an invariant outside a single property.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl Error {
    pub(crate) fn invalid(
        context: &'static str,
        key: &str,
        value: &str,
        reason: impl Into<String>,
    ) -> Self {
        Error::InvalidProperty {
            context,
            key: key.to_string(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}

/// Convenience alias for results returned by seqforge crates.
pub type Result<T> = std::result::Result<T, Error>;
