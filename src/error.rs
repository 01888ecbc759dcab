//! Error types for boundary-crossing conversions.
//!
//! Every failure a conversion can produce is a [`BridgeError`]. All but one
//! variant are *fatal*: the boundary-crossing call must return the error and
//! the caller must not retry, because continuing risks reading foreign memory
//! through the wrong layout. The single recoverable condition is
//! [`BridgeError::ObjectAlreadyReleased`], which a well-behaved host program
//! may observe in normal control flow (an object manually released and then
//! referenced again).

use thiserror::Error;

/// Result alias for all bridge operations.
pub type BridgeResult<T> = Result<T, BridgeError>;

/// Errors produced by the marshaling bridge.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BridgeError {
    /// A host type was used before being bound to a managed descriptor.
    ///
    /// This is a programming error in the registration front end, surfaced
    /// at first use.
    #[error("type '{0}' has no managed descriptor bound")]
    UnboundType(String),

    /// `bind` was called twice for the same host type.
    #[error("type '{0}' was already bound")]
    DuplicateBinding(String),

    /// A managed value's runtime type is incompatible with the descriptor
    /// bound for the expected host type. Extraction is aborted; proceeding
    /// would reinterpret foreign memory through the wrong layout.
    #[error("type mismatch: expected '{expected}', found '{found}'")]
    TypeMismatch { expected: String, found: String },

    /// Decode of a released boxed object into a value or reference context.
    ///
    /// The only recoverable error in the taxonomy; pointer-context decodes
    /// observe absence as a null instead.
    #[error("host object of type '{0}' was already released")]
    ObjectAlreadyReleased(String),

    /// A bits-type byte size disagrees between the host layout and the
    /// bound descriptor's declared size. Indicates a binding-declaration bug.
    #[error("size mismatch for '{name}': host value is {host} bytes, descriptor declares {declared}")]
    SizeMismatch {
        name: String,
        host: usize,
        declared: usize,
    },

    /// Pointer extraction was attempted on a value that has bits layout.
    ///
    /// Bits values are raw byte copies with no host object behind them, so
    /// this is categorically invalid and distinct from a type mismatch.
    #[error("pointer access to bits-layout type '{0}' is invalid")]
    InvalidPointerAccess(String),
}

impl BridgeError {
    /// Whether a host program is expected to handle this error in normal
    /// control flow. Everything except `ObjectAlreadyReleased` indicates a
    /// binding-declaration or call-site bug.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, BridgeError::ObjectAlreadyReleased(_))
    }

    /// Short machine-readable name for the error category.
    pub fn kind(&self) -> &'static str {
        match self {
            BridgeError::UnboundType(_) => "unbound-type",
            BridgeError::DuplicateBinding(_) => "duplicate-binding",
            BridgeError::TypeMismatch { .. } => "type-mismatch",
            BridgeError::ObjectAlreadyReleased(_) => "object-already-released",
            BridgeError::SizeMismatch { .. } => "size-mismatch",
            BridgeError::InvalidPointerAccess(_) => "invalid-pointer-access",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_released_is_recoverable() {
        assert!(BridgeError::ObjectAlreadyReleased("Widget".into()).is_recoverable());
        assert!(!BridgeError::UnboundType("Widget".into()).is_recoverable());
        assert!(!BridgeError::DuplicateBinding("Widget".into()).is_recoverable());
        assert!(
            !BridgeError::TypeMismatch {
                expected: "A".into(),
                found: "B".into()
            }
            .is_recoverable()
        );
        assert!(
            !BridgeError::SizeMismatch {
                name: "Point".into(),
                host: 16,
                declared: 8
            }
            .is_recoverable()
        );
        assert!(!BridgeError::InvalidPointerAccess("Point".into()).is_recoverable());
    }

    #[test]
    fn display_messages() {
        let err = BridgeError::TypeMismatch {
            expected: "Widget".into(),
            found: "Gadget".into(),
        };
        assert_eq!(
            err.to_string(),
            "type mismatch: expected 'Widget', found 'Gadget'"
        );

        let err = BridgeError::SizeMismatch {
            name: "Point".into(),
            host: 16,
            declared: 12,
        };
        assert!(err.to_string().contains("16 bytes"));
        assert!(err.to_string().contains("declares 12"));
    }

    #[test]
    fn kind_names_are_distinct() {
        use std::collections::HashSet;
        let errors = [
            BridgeError::UnboundType(String::new()),
            BridgeError::DuplicateBinding(String::new()),
            BridgeError::TypeMismatch {
                expected: String::new(),
                found: String::new(),
            },
            BridgeError::ObjectAlreadyReleased(String::new()),
            BridgeError::SizeMismatch {
                name: String::new(),
                host: 0,
                declared: 0,
            },
            BridgeError::InvalidPointerAccess(String::new()),
        ];
        let kinds: HashSet<_> = errors.iter().map(|e| e.kind()).collect();
        assert_eq!(kinds.len(), errors.len());
    }
}
