//! Random identifiers.

use crate::error::{KiutilsError, Result};
use rand::distr::Alphanumeric;
use rand::Rng;

/// Random string of `length` characters drawn from `a-z`, `A-Z` and `0-9`.
pub fn rand_string(length: usize) -> Result<String> {
    if length == 0 {
        return Err(KiutilsError::InvalidArgument(
            "length must be a positive number".to_string(),
        ));
    }
    Ok(rand::rng()
        .sample_iter(&Alphanumeric)
        .take(length)
        .map(char::from)
        .collect())
}
