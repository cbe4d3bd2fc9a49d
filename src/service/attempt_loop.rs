use crate::domain::payment::AttemptStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopDirective {
    Done,
    Continue,
    FailNow,
}

/// Total attempts allowed for one logical payment. `max_retries` caps the
/// count including the first attempt; with fallback disabled a failure is
/// terminal, so the budget collapses to at most one.
pub fn attempt_budget(max_retries: i32, fallback_enabled: bool) -> i32 {
    let cap = max_retries.max(0);
    if fallback_enabled {
        cap
    } else {
        cap.min(1)
    }
}

/// Decides what the loop does after an attempt lands. `attempts_made` counts
/// the attempt that just finished.
pub fn after_attempt(
    status: AttemptStatus,
    attempts_made: i32,
    budget: i32,
    fallback_enabled: bool,
) -> LoopDirective {
    if status.is_success() {
        return LoopDirective::Done;
    }
    if !fallback_enabled {
        return LoopDirective::FailNow;
    }
    if attempts_made >= budget {
        return LoopDirective::FailNow;
    }
    LoopDirective::Continue
}
