//! Fault recovery choices and per-run skip state.

/// What to do after an entry fault.
///
/// Returned by the error handler installed with
/// [`ExtractionConfig::with_error_handler`](crate::ExtractionConfig::with_error_handler).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ErrorHandlerChoice {
    /// Re-run validation and materialization for the same entry.
    Retry,
    /// Skip this entry and continue.
    Skip,
    /// Skip this entry and every later faulting entry without asking again.
    SkipAll,
    /// Stop the run; extraction returns normally with a partial report.
    Abort,
    /// Stop the run and return the fault.
    #[default]
    BailOut,
}

/// Skip-all state of one extraction run.
///
/// The only transition is `Normal -> SkipRemaining`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) enum SessionState {
    #[default]
    Normal,
    SkipRemaining,
}

impl SessionState {
    /// Resolves the choice for a fault, consulting `ask` only while the
    /// session is `Normal`.
    ///
    /// A `SkipAll` answer moves the session to `SkipRemaining` and is
    /// reported as `Skip`.
    pub(crate) fn decide(&mut self, ask: impl FnOnce() -> ErrorHandlerChoice) -> ErrorHandlerChoice {
        match self {
            Self::SkipRemaining => ErrorHandlerChoice::Skip,
            Self::Normal => match ask() {
                ErrorHandlerChoice::SkipAll => {
                    *self = Self::SkipRemaining;
                    ErrorHandlerChoice::Skip
                }
                choice => choice,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_choice_is_bail_out() {
        assert_eq!(ErrorHandlerChoice::default(), ErrorHandlerChoice::BailOut);
    }

    #[test]
    fn test_normal_passes_choice_through() {
        let mut state = SessionState::default();
        assert_eq!(state.decide(|| ErrorHandlerChoice::Retry), ErrorHandlerChoice::Retry);
        assert_eq!(state.decide(|| ErrorHandlerChoice::Abort), ErrorHandlerChoice::Abort);
        assert_eq!(state, SessionState::Normal);
    }

    #[test]
    fn test_skip_all_is_sticky() {
        let mut state = SessionState::default();
        assert_eq!(state.decide(|| ErrorHandlerChoice::SkipAll), ErrorHandlerChoice::Skip);
        assert_eq!(state, SessionState::SkipRemaining);

        let mut asked = false;
        let choice = state.decide(|| {
            asked = true;
            ErrorHandlerChoice::BailOut
        });
        assert_eq!(choice, ErrorHandlerChoice::Skip);
        assert!(!asked);
    }
}
