//! Random short-code generation and collision resolution

use rand::{distr::Alphanumeric, Rng};
use tracing::warn;

use crate::error::{LinkError, Result};
use crate::validator::{MAX_CODE_LEN, MIN_CODE_LEN};

/// Collisions tolerated before allocation starts logging about it
pub const SOFT_ATTEMPTS: usize = 10;

/// Hard cap on allocation attempts before giving up with `CodeSpaceExhausted`
pub const MAX_ATTEMPTS: usize = 1000;

/// Produces a code of `length` characters drawn uniformly from `[A-Za-z0-9]`
pub fn generate(length: usize) -> String {
    generate_with(&mut rand::rng(), length)
}

pub fn generate_with<R: Rng>(rng: &mut R, length: usize) -> String {
    (0..length)
        .map(|_| char::from(rng.sample(Alphanumeric)))
        .collect()
}

/// Draws random 6-8 character codes until one is not taken
///
/// `is_taken` is expected to compare case-insensitively.
pub fn allocate_unique_code<F>(is_taken: F) -> Result<String>
where
    F: Fn(&str) -> bool,
{
    allocate_unique_code_with(&mut rand::rng(), is_taken)
}

pub fn allocate_unique_code_with<R, F>(rng: &mut R, is_taken: F) -> Result<String>
where
    R: Rng,
    F: Fn(&str) -> bool,
{
    for attempt in 1..=MAX_ATTEMPTS {
        let length = rng.random_range(MIN_CODE_LEN..=MAX_CODE_LEN);
        let candidate = generate_with(rng, length);

        if !is_taken(&candidate) {
            return Ok(candidate);
        }

        if attempt == SOFT_ATTEMPTS {
            warn!(attempt, "short code collided repeatedly, still retrying");
        }
    }

    warn!(attempts = MAX_ATTEMPTS, "gave up allocating a short code");
    Err(LinkError::CodeSpaceExhausted(MAX_ATTEMPTS))
}
