//! Canonicalization backends.
//!
//! The pipeline never looks inside the formatter: it hands over the raw bytes
//! of one work item and writes back whatever comes out. Anything implementing
//! [`Formatter`] can be plugged into the dispatcher:
//! - [`hcl`]: the production backend, built on the `hcl-edit` crate; it
//!   only rewrites whitespace, so comments and blank-line groups survive
//! - [`Identity`]: passes bytes through untouched (handy for dry runs and tests)

pub mod hcl;
mod trivia;

pub use self::hcl::HclFormatter;

use crate::error::BoxError;

/// A pure, deterministic `bytes -> bytes` canonicalization step.
///
/// Implementations must not have side effects; an `Err` means the input is not
/// well-formed for the target syntax.
pub trait Formatter {
    fn format(&self, source: &[u8]) -> Result<Vec<u8>, BoxError>;
}

impl<F: Formatter + ?Sized> Formatter for &F {
    fn format(&self, source: &[u8]) -> Result<Vec<u8>, BoxError> {
        (**self).format(source)
    }
}

/// Formatter that returns its input unchanged.
#[derive(Debug, Default, Clone, Copy)]
pub struct Identity;

impl Formatter for Identity {
    fn format(&self, source: &[u8]) -> Result<Vec<u8>, BoxError> {
        Ok(source.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_preserves_bytes() {
        let input = b"a = 1\r\n\xff no trailing newline";
        assert_eq!(Identity.format(input).unwrap(), input.to_vec());
    }

    #[test]
    fn test_reference_forwarding() {
        let formatter = &Identity;
        assert_eq!(formatter.format(b"x").unwrap(), b"x".to_vec());
    }
}
