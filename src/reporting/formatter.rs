use crate::errors::GradewatchError;
use crate::models::Verdict;

/// Outcome of a one-off scan, as printed by `gradewatch scan`.
pub enum ScanLine<'a> {
    Graded(&'a Verdict),
    Failed(&'a GradewatchError),
    Superseded,
}

pub fn format_scan_line(hostname: &str, line: &ScanLine<'_>) -> String {
    match line {
        ScanLine::Graded(verdict) => {
            format!("{:<40} {:<3} {}", hostname, verdict.grade, verdict.tier)
        }
        ScanLine::Failed(error) => {
            format!("{:<40} {:<3} {}", hostname, "-", error)
        }
        ScanLine::Superseded => format!("{:<40} {:<3} superseded", hostname, "-"),
    }
}

pub fn format_grade_scale(letter: &str, scale: f64) -> String {
    format!("{:<3} {:>5.1}", letter, scale)
}
