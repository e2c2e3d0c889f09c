//! Threshold decision policy
//!
//! The final classification comes from the resolved confidence and the
//! configured threshold. The backend's own label tensor is never
//! authoritative; it is carried only as a diagnostic.

use serde::{Deserialize, Serialize};

/// Final weld classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Label {
    Good,
    Bad,
}

impl std::fmt::Display for Label {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Label::Good => write!(f, "Good"),
            Label::Bad => write!(f, "Bad"),
        }
    }
}

/// The externally reported result of one prediction
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    pub label: Label,
    pub confidence: f64,
}

/// Apply the threshold policy: Bad when confidence >= threshold, else Good
///
/// Out-of-range thresholds are accepted as-is; a threshold above 1.0 simply
/// makes Bad unreachable (and vice versa below 0.0).
pub fn decide(confidence: f64, threshold: f64) -> Decision {
    let label = if confidence >= threshold {
        Label::Bad
    } else {
        Label::Good
    };
    Decision { label, confidence }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bad_at_and_above_threshold() {
        assert_eq!(decide(0.5, 0.5).label, Label::Bad);
        assert_eq!(decide(0.51, 0.5).label, Label::Bad);
        assert_eq!(decide(0.49, 0.5).label, Label::Good);
    }

    #[test]
    fn test_flip_exactly_at_threshold() {
        let t = 0.37;
        assert_eq!(decide(t, t).label, Label::Bad);
        assert_eq!(decide(t - f64::EPSILON, t).label, Label::Good);
    }

    #[test]
    fn test_monotone_in_confidence() {
        let t = 0.6;
        let mut last_was_bad = false;
        for i in 0..=100 {
            let c = i as f64 / 100.0;
            let bad = decide(c, t).label == Label::Bad;
            // Once Bad, stays Bad as confidence rises
            assert!(!last_was_bad || bad);
            last_was_bad = bad;
        }
    }

    #[test]
    fn test_out_of_range_threshold_accepted() {
        assert_eq!(decide(1.0, 1.5).label, Label::Good);
        assert_eq!(decide(0.0, -0.5).label, Label::Bad);
    }

    #[test]
    fn test_confidence_passed_through() {
        let d = decide(0.87, 0.5);
        assert_eq!(d.confidence, 0.87);
    }

    #[test]
    fn test_label_display() {
        assert_eq!(Label::Good.to_string(), "Good");
        assert_eq!(Label::Bad.to_string(), "Bad");
    }
}
