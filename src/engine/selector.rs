//! Nickname selection for joining members.

use rand::RngExt;
use std::collections::HashSet;

use super::error::NoneAvailable;

/// Pick a pool name nobody else is using, uniformly at random.
///
/// Returns [`NoneAvailable`] when every name is excluded. There is no
/// fallback: leaving the member's nickname alone beats handing out a
/// duplicate.
pub fn select_random<'a, R: RngExt>(
    pool: &'a [String],
    excluded: &HashSet<String>,
    rng: &mut R,
) -> Result<&'a str, NoneAvailable> {
    let available: Vec<&'a str> = pool
        .iter()
        .map(String::as_str)
        .filter(|name| !excluded.contains(*name))
        .collect();
    if available.is_empty() {
        return Err(NoneAvailable);
    }
    Ok(available[rng.random_range(0..available.len())])
}

/// Nickname for name mode: `prefix` followed by the display name, verbatim.
pub fn select_from_display_name(display_name: &str, prefix: &str) -> String {
    format!("{}{}", prefix, display_name)
}
