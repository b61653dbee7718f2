//! Random short code generation.
//!
//! Codes are drawn uniformly from the 62-character alphanumeric alphabet
//! using the thread-local CSPRNG, so they are unpredictable and safe to use
//! directly in URL path segments.

use rand::Rng;

use crate::utils::base62::ALPHABET;

/// Source of freshly generated short codes.
///
/// Injected into the link service so tests can force collisions.
///
/// # Implementations
///
/// - [`RandomCodeGenerator`] - cryptographically secure random codes
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
pub trait CodeGenerator: Send + Sync {
    /// Generates a code of exactly `length` alphanumeric characters.
    ///
    /// `length = 0` yields the empty string.
    fn generate(&self, length: usize) -> String;
}

/// Generates random short codes from the 62-character alphabet.
///
/// A 7-character code gives 62^7 ≈ 3.5 trillion combinations, which makes
/// collisions rare enough that the allocation retry loop absorbs them.
pub struct RandomCodeGenerator;

impl CodeGenerator for RandomCodeGenerator {
    fn generate(&self, length: usize) -> String {
        let mut rng = rand::rng();

        (0..length)
            .map(|_| ALPHABET[rng.random_range(0..ALPHABET.len())] as char)
            .collect()
    }
}
