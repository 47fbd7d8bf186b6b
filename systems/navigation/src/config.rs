//! Tuning knobs for the navigation policy.

use serde::Deserialize;

/// Default number of frontier cells path-searched per exploring turn.
pub const DEFAULT_FRONTIER_CANDIDATES: usize = 2;

/// Configuration consumed by [`crate::NavigationPolicy`].
///
/// Every field is optional when deserialised; missing keys fall back to the
/// defaults below.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NavigationConfig {
    /// Frontier cells considered per exploring turn, in row-major order.
    /// Values below one are treated as one.
    pub frontier_candidates: usize,
    /// Check that the next cached step still neighbors the agent and is
    /// passable before consuming it, recomputing the cached path otherwise.
    ///
    /// Off by default: cached paths are drained until empty even if the grid
    /// changed underneath them.
    pub revalidate_cached_paths: bool,
}

impl NavigationConfig {
    pub(crate) fn candidate_limit(&self) -> usize {
        self.frontier_candidates.max(1)
    }
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            frontier_candidates: DEFAULT_FRONTIER_CANDIDATES,
            revalidate_cached_paths: false,
        }
    }
}
