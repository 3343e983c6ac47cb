//! Search and iteration ceilings for error recovery.

use serde::{Deserialize, Serialize};

/// Tokens the search may look past the error point.
pub const LOOKAHEAD_LIMIT: usize = 4;

/// Resolution attempts allowed at one token position.
pub const RESOLUTION_ITER_LIMIT: usize = 7;

/// Completion attempts allowed at one token position.
pub const COMPLETION_ITER_LIMIT: usize = 15;

/// Non-terminal rules the search may step over without reaching a terminal.
const MAX_RULE_SKIPS: usize = 64;

/// Ceilings for one [`ErrorHandler`](super::ErrorHandler).
///
/// Deserializable so tooling can load them from a config file; missing
/// fields take their default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecoveryLimits {
    pub lookahead_limit: usize,
    pub resolution_iter_limit: usize,
    pub completion_iter_limit: usize,
}

impl Default for RecoveryLimits {
    fn default() -> Self {
        Self {
            lookahead_limit: LOOKAHEAD_LIMIT,
            resolution_iter_limit: RESOLUTION_ITER_LIMIT,
            completion_iter_limit: COMPLETION_ITER_LIMIT,
        }
    }
}

/// Bounds a loop that does not otherwise make measurable progress.
///
/// ```ignore
/// let mut guard = LoopGuard::new("next_rule");
/// while !is_terminal(ctx) {
///     if !guard.check() {
///         return Err(NotViable);
///     }
///     ctx = next_rule(ctx, stack)?;
/// }
/// ```
pub(crate) struct LoopGuard {
    name: &'static str,
    count: usize,
    max: usize,
}

impl LoopGuard {
    #[inline]
    pub(crate) fn new(name: &'static str) -> Self {
        Self::with_limit(name, MAX_RULE_SKIPS)
    }

    #[inline]
    pub(crate) fn with_limit(name: &'static str, max: usize) -> Self {
        Self { name, count: 0, max }
    }

    /// Count one iteration. Returns false once the limit is exceeded.
    #[inline]
    pub(crate) fn check(&mut self) -> bool {
        self.count += 1;
        if self.count > self.max {
            tracing::trace!(name = self.name, max = self.max, "loop guard tripped");
            return false;
        }
        true
    }
}
