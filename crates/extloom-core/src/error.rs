//! Error types for descriptor construction and the wire codec.

use crate::model::TypeIdentity;

/// Result type for descriptor construction.
pub type BuildResult<T> = std::result::Result<T, BuildError>;

/// Result type for codec operations.
pub type CodecResult<T> = std::result::Result<T, CodecError>;

/// Descriptor construction errors.
///
/// Each error concerns one owning type; callers processing several owners
/// can report it and move on to the next.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BuildError {
    /// Two members are annotated as the designated method.
    #[error("Cannot have instance method '{duplicate}' when '{existing}' is already defined")]
    DuplicateDesignated { existing: String, duplicate: String },

    /// No member is annotated as the designated method.
    #[error("{owner} must have an instance method specified")]
    MissingDesignated { owner: TypeIdentity },

    /// The designated method does not return the owner type.
    #[error("{owner} instance method must return its own type (found {found})")]
    DesignatedReturnMismatch {
        owner: TypeIdentity,
        found: TypeIdentity,
    },

    /// Nothing besides the designated method is annotated.
    #[error("{owner} has no annotated methods to process")]
    NoMethods { owner: TypeIdentity },

    /// The declaration provider failed.
    #[error("Declaration provider error: {0}")]
    Provider(String),
}

/// Wire format errors.
///
/// Every variant means the payload is corrupt or was written by an
/// incompatible encoder.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// Unrecognized behavior kind tag.
    #[error("invalid method kind: {0}")]
    InvalidMethodKind(String),

    /// Unrecognized delegate kind tag.
    #[error("invalid delegate kind: {0}")]
    InvalidDelegateKind(String),

    /// Unrecognized qualifier keyword.
    #[error("unknown qualifier: {0}")]
    UnknownQualifier(String),

    /// Token could not be read or written.
    #[error("malformed token stream: {0}")]
    Malformed(String),

    /// Bytes left over after a complete payload.
    #[error("{0} trailing bytes after payload")]
    TrailingBytes(usize),
}

impl From<bincode::Error> for CodecError {
    fn from(e: bincode::Error) -> Self {
        CodecError::Malformed(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = BuildError::DuplicateDesignated {
            existing: "get".to_string(),
            duplicate: "instance".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Cannot have instance method 'instance' when 'get' is already defined"
        );

        let err = BuildError::NoMethods {
            owner: TypeIdentity::new("com.example.Strings"),
        };
        assert_eq!(err.to_string(), "com.example.Strings has no annotated methods to process");

        let err = CodecError::InvalidMethodKind("Bogus".to_string());
        assert_eq!(err.to_string(), "invalid method kind: Bogus");
    }
}
