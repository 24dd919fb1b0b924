//! Survey follow-up answers and free-text classification.

use std::fmt;
use std::str::FromStr;

const AFFIRMATIVE: &[&str] = &["yes", "yeah", "yep", "y", "done", "filled", "submitted", "completed"];
const NEGATIVE: &[&str] = &["no", "nope", "n", "not"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FollowupAnswer {
    Yes,
    No,
}

impl FollowupAnswer {
    /// Value carried by the matching quick-reply button.
    #[must_use]
    pub fn value(self) -> &'static str {
        match self {
            Self::Yes => "yes",
            Self::No => "no",
        }
    }

    /// Keyword match on a free-text message.
    ///
    /// Negative keywords win, so "not done yet" reads as `No`.
    #[must_use]
    pub fn classify(text: &str) -> Option<Self> {
        let lowered = text.to_lowercase();
        let words: Vec<&str> = lowered
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
            .collect();
        if words.iter().any(|w| NEGATIVE.contains(w)) {
            Some(Self::No)
        } else if words.iter().any(|w| AFFIRMATIVE.contains(w)) {
            Some(Self::Yes)
        } else {
            None
        }
    }
}

impl fmt::Display for FollowupAnswer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.value())
    }
}

impl FromStr for FollowupAnswer {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "yes" => Ok(Self::Yes),
            "no" => Ok(Self::No),
            _ => Err(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_affirmatives() {
        for text in ["Yes", "yes!", "Yeah I did", "done", "I filled it", "Submitted it already"] {
            assert_eq!(FollowupAnswer::classify(text), Some(FollowupAnswer::Yes), "{text}");
        }
    }

    #[test]
    fn classify_negatives() {
        for text in ["No", "nope", "not yet", "No, not yet"] {
            assert_eq!(FollowupAnswer::classify(text), Some(FollowupAnswer::No), "{text}");
        }
    }

    #[test]
    fn negative_wins_over_affirmative() {
        assert_eq!(FollowupAnswer::classify("not done"), Some(FollowupAnswer::No));
    }

    #[test]
    fn keywords_match_whole_words_only() {
        assert_eq!(FollowupAnswer::classify("I know"), None);
        assert_eq!(FollowupAnswer::classify("eyes"), None);
        assert_eq!(FollowupAnswer::classify("what is this form about?"), None);
    }

    #[test]
    fn quick_reply_values_round_trip() {
        assert_eq!("yes".parse::<FollowupAnswer>(), Ok(FollowupAnswer::Yes));
        assert_eq!("no".parse::<FollowupAnswer>(), Ok(FollowupAnswer::No));
        assert!("maybe".parse::<FollowupAnswer>().is_err());
    }
}
