//! Page controllers.
//!
//! Each page fetches its collections on first use, derives its statistics
//! from the full in-memory list on every request, and (where it mutates)
//! runs an explicit two-phase commit: apply the change to the local view
//! first, then issue the remote call, and on failure roll back by
//! re-fetching the whole list from the record store. The rollback is total;
//! no partial local patching survives a failed remote call.
//!
//! Fetch failures never produce an error page: after logging, the page
//! degrades to its empty state and stays re-renderable.

pub mod careers;
pub mod dashboard;
pub mod skills;
pub mod vault;
pub mod verification;

use serde::Serialize;

/// Terminal page states. `loading` is transient and never rendered; a page
/// lands on `ready` or `ready_empty`, including after fetch failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PageStatus {
    Ready,
    ReadyEmpty,
}

impl PageStatus {
    pub fn of<T>(items: &[T]) -> Self {
        if items.is_empty() {
            PageStatus::ReadyEmpty
        } else {
            PageStatus::Ready
        }
    }
}
