use crate::models::grade::{scale_or_worst, scale_to_letter, MISSING_GRADE};
use crate::models::{ScanResult, Verdict};

/// Worst endpoint grade of `result`, with its tier.
///
/// Endpoints without a grade count as `F`, and so does a result with no
/// endpoints at all.
pub fn aggregate(result: &ScanResult) -> Verdict {
    let worst = result
        .grades()
        .map(scale_or_worst)
        .fold(None, |worst: Option<f64>, scale| {
            Some(worst.map_or(scale, |w| w.min(scale)))
        });

    let grade = worst
        .and_then(|scale| scale_to_letter(scale).ok())
        .unwrap_or_else(|| MISSING_GRADE.to_string());

    Verdict::new(grade)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Tier;

    #[test]
    fn test_worst_grade_wins() {
        let result = ScanResult::with_grades(&[Some("B"), Some("A"), Some("D")]);
        let verdict = aggregate(&result);
        assert_eq!(verdict.grade, "D");
        assert_eq!(verdict.tier, Tier::Warn);
    }

    #[test]
    fn test_empty_endpoints_is_worst_case() {
        let verdict = aggregate(&ScanResult::with_grades(&[]));
        assert_eq!(verdict.grade, "F");
        assert_eq!(verdict.tier, Tier::Bad);
    }

    #[test]
    fn test_missing_grade_counts_as_f() {
        let verdict = aggregate(&ScanResult::with_grades(&[Some("A+"), None]));
        assert_eq!(verdict.grade, "F");
        assert_eq!(verdict.tier, Tier::Bad);
    }

    #[test]
    fn test_modifiers_survive_aggregation() {
        let verdict = aggregate(&ScanResult::with_grades(&[Some("A+"), Some("A-"), Some("A")]));
        assert_eq!(verdict.grade, "A-");
        assert_eq!(verdict.tier, Tier::Good);
    }

    #[test]
    fn test_untrusted_is_worse_than_f() {
        let verdict = aggregate(&ScanResult::with_grades(&[Some("F"), Some("T")]));
        assert_eq!(verdict.grade, "T");
    }

    #[test]
    fn test_order_independent() {
        let grades = [Some("C"), Some("A+"), Some("B"), Some("E")];
        let forward = aggregate(&ScanResult::with_grades(&grades));
        let mut reversed = grades;
        reversed.reverse();
        assert_eq!(forward, aggregate(&ScanResult::with_grades(&reversed)));
        assert_eq!(forward.grade, "E");
    }

    #[test]
    fn test_single_good_endpoint() {
        let verdict = aggregate(&ScanResult::with_grades(&[Some("A+")]));
        assert_eq!(verdict.grade, "A+");
        assert_eq!(verdict.tier, Tier::Good);
    }
}
