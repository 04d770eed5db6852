//! Conversion between letter grades and a numeric scale.
//!
//! `A` sits at 4 and every following letter is one point lower, so `E` is 0,
//! `F` is -1 and `T` (untrusted certificate) is -15. A `+` or `-` suffix moves
//! the value by 0.3 in the matching direction. Lower is worse, which lets the
//! aggregator pick the worst grade with a plain minimum.

use crate::errors::GradewatchError;

/// Letter at scale 0.
const ZERO_LETTER: u8 = b'E';
const MODIFIER_STEP: f64 = 0.3;

/// Grade assumed for an endpoint that did not report one.
pub const MISSING_GRADE: &str = "F";

pub fn letter_to_scale(letter: &str) -> Result<f64, GradewatchError> {
    let (base, modifier) = match letter.as_bytes() {
        [base] => (*base, None),
        [base, modifier] => (*base, Some(*modifier)),
        _ => return Err(GradewatchError::InvalidGrade(letter.to_string())),
    };

    if !base.is_ascii_uppercase() {
        return Err(GradewatchError::InvalidGrade(letter.to_string()));
    }

    let mut scale = f64::from(ZERO_LETTER) - f64::from(base);
    match modifier {
        None => {}
        Some(b'+') => scale += MODIFIER_STEP,
        Some(b'-') => scale -= MODIFIER_STEP,
        Some(_) => return Err(GradewatchError::InvalidGrade(letter.to_string())),
    }

    Ok(round_tenth(scale))
}

pub fn scale_to_letter(scale: f64) -> Result<String, GradewatchError> {
    if !scale.is_finite() {
        return Err(GradewatchError::InvalidGrade(scale.to_string()));
    }

    let whole = scale.round();
    let code = f64::from(ZERO_LETTER) - whole;
    if !(f64::from(b'A')..=f64::from(b'Z')).contains(&code) {
        return Err(GradewatchError::InvalidGrade(scale.to_string()));
    }

    let mut letter = String::with_capacity(2);
    letter.push(char::from(code as u8));

    let remainder = round_tenth(scale - whole);
    if remainder > 0.0 {
        letter.push('+');
    } else if remainder < 0.0 {
        letter.push('-');
    }

    Ok(letter)
}

/// Scale for an optional endpoint grade; absent or unreadable grades count as `F`.
pub fn scale_or_worst(grade: Option<&str>) -> f64 {
    grade
        .and_then(|g| letter_to_scale(g.trim()).ok())
        .unwrap_or(-1.0)
}

fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
