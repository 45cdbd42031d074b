use std::env;

/// What the rating recompute does when a restaurant is left with no active
/// feedback. The original system left the stored rating untouched on the
/// recompute path while the dashboard reports 0 for a missing rating; the
/// policy makes that choice explicit instead of silent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EmptyFeedbackPolicy {
    /// Leave the stored rating as it was.
    #[default]
    Keep,
    /// Clear the stored rating.
    Reset,
}

#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    pub empty_feedback_policy: EmptyFeedbackPolicy,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let empty_feedback_policy = match env::var("RATING_EMPTY_FEEDBACK_POLICY").as_deref() {
            Ok("reset") => EmptyFeedbackPolicy::Reset,
            Ok("keep") | Err(_) => EmptyFeedbackPolicy::Keep,
            Ok(other) => {
                log::warn!(
                    "Unknown RATING_EMPTY_FEEDBACK_POLICY '{}', falling back to 'keep'",
                    other
                );
                EmptyFeedbackPolicy::Keep
            }
        };
        Self {
            empty_feedback_policy,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_policy_keeps_stale_rating() {
        assert_eq!(EmptyFeedbackPolicy::default(), EmptyFeedbackPolicy::Keep);
    }
}
