use serde::{Deserialize, Serialize};

/// Coarse bucket for an aggregated grade, used for the status color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Good,
    Warn,
    Bad,
}

impl Tier {
    pub fn from_grade(grade: &str) -> Self {
        match grade {
            "A+" | "A" | "A-" => Tier::Good,
            "B" | "C" | "D" => Tier::Warn,
            _ => Tier::Bad,
        }
    }

    /// Status background color.
    pub fn color(&self) -> &'static str {
        match self {
            Tier::Good => "#72D43D",
            Tier::Warn => "#FFCD21",
            Tier::Bad => "#FF462C",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Good => "good",
            Tier::Warn => "warn",
            Tier::Bad => "bad",
        }
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Worst-case grade of a scan result and its tier. Recomputed on demand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    pub grade: String,
    pub tier: Tier,
}

impl Verdict {
    pub fn new(grade: String) -> Self {
        let tier = Tier::from_grade(&grade);
        Self { grade, tier }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_buckets() {
        for g in ["A+", "A", "A-"] {
            assert_eq!(Tier::from_grade(g), Tier::Good);
        }
        for g in ["B", "C", "D"] {
            assert_eq!(Tier::from_grade(g), Tier::Warn);
        }
        for g in ["E", "F", "T", "M", "B-", ""] {
            assert_eq!(Tier::from_grade(g), Tier::Bad);
        }
    }

    #[test]
    fn test_tier_colors_distinct() {
        assert_ne!(Tier::Good.color(), Tier::Warn.color());
        assert_ne!(Tier::Warn.color(), Tier::Bad.color());
    }

    #[test]
    fn test_verdict_derives_tier() {
        let verdict = Verdict::new("D".to_string());
        assert_eq!(verdict.tier, Tier::Warn);
    }
}
