//! The soft-error handler: intercepts float arithmetic conditions that the
//! reference source recovers from rather than unwinding a statement for.
//!
//! Overflow and division-by-zero are reported through [`log`] at `warn`
//! level (unless paused) and then the already-substituted signed-maximum
//! value is returned as-is. Underflow is always silent: MBF has no
//! denormals, so quietly rounding to zero is the only sensible outcome.

use crate::mbf::SoftCondition;

/// Per-interpreter pause state for float soft-error reporting.
///
/// Mirrors `Values._float_error_handler` / `pause_error_handling` in the
/// reference source: a single boolean flag an enclosing interpreter can
/// toggle around code that expects (and wants to ignore) overflow, such as
/// re-evaluating an expression after a resumed error trap.
#[derive(Debug, Default, Clone, Copy)]
pub struct SoftErrorHandler {
    paused: bool,
}

impl SoftErrorHandler {
    pub fn new() -> Self {
        SoftErrorHandler { paused: false }
    }

    pub fn pause(&mut self, do_pause: bool) {
        self.paused = do_pause;
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Observe the outcome of a float operation that may have substituted a
    /// signed-maximum result. Logs a warning for `Overflow`/`DivisionByZero`
    /// unless paused; `Underflow` never logs.
    pub fn report(&self, label: &str, condition: SoftCondition) {
        match condition {
            SoftCondition::Normal | SoftCondition::Underflow => {}
            SoftCondition::Overflow => {
                if !self.paused {
                    log::warn!("{label}: overflow, substituting signed maximum");
                }
            }
            SoftCondition::DivisionByZero => {
                if !self.paused {
                    log::warn!("{label}: division by zero, substituting signed maximum");
                }
            }
        }
    }
}
