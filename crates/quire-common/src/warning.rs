//! Layout warnings routed through the `log` facade.
//!
//! Provides deduplication to avoid spamming the same warning multiple times
//! while a document is paginated.

use std::collections::HashSet;
use std::sync::Mutex;

/// Global set of warnings we've already emitted (to deduplicate)
static WARNED: Mutex<Option<HashSet<String>>> = Mutex::new(None);

/// Warn about a recoverable problem (emitted once per unique message)
///
/// Returns `true` when the warning was emitted, `false` when it had already
/// been reported.
///
/// # Example
/// ```
/// use quire_common::warning::warn_once;
///
/// let first = warn_once("Page", "layout made no progress on page 3");
/// let second = warn_once("Page", "layout made no progress on page 3");
/// assert!(first && !second);
/// ```
pub fn warn_once(component: &str, message: &str) -> bool {
    let key = format!("[{component}] {message}");
    // Inserts never leave the set half-written, so a poisoned lock is still usable.
    let mut guard = WARNED
        .lock()
        .unwrap_or_else(std::sync::PoisonError::into_inner);
    let fresh = guard.get_or_insert_with(HashSet::new).insert(key);

    if fresh {
        log::warn!(target: "quire", "[{component}] {message}");
    }
    fresh
}

/// Clear all recorded warnings (call before laying out a new document)
pub fn clear_warnings() {
    let mut guard = WARNED
        .lock()
        .unwrap_or_else(std::sync::PoisonError::into_inner);
    if let Some(set) = guard.as_mut() {
        set.clear();
    }
}
