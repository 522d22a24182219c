//! Fallible lazy initialization over [`OnceLock`].

use std::sync::OnceLock;

/// Returns the cached value, computing it with `init` on first success.
///
/// Failures are returned and leave the cell empty, so a later call retries.
/// Concurrent first calls may each run `init`; the first stored value wins.
pub(crate) fn get_or_try_init<T, E>(
    cell: &OnceLock<T>,
    init: impl FnOnce() -> Result<T, E>,
) -> Result<&T, E> {
    if let Some(value) = cell.get() {
        return Ok(value);
    }
    let value = init()?;
    Ok(cell.get_or_init(|| value))
}
