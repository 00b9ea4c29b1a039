/// Errors raised by registry and factory calls.
///
/// Parsing and serialization never return these. Problems found in content
/// are logged and surface as invalid or fallback blocks instead.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BlockError {
    #[error("Invalid block name `{0}`: expected `namespace/block-name` in lowercase")]
    InvalidName(String),
    #[error("Block type `{0}` is already registered")]
    AlreadyRegistered(String),
    #[error("Block type `{0}` is not registered")]
    NotRegistered(String),
    #[error("Invalid selector `{selector}`: {reason}")]
    InvalidSelector { selector: String, reason: String },
    #[error("Block type `{name}` has no transform to `{target}`")]
    NoTransform { name: String, target: String },
}
