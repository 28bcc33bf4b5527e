//! The 10-point to letter/verbal/4.0 grading scale.
//!
//! The scale is a descending ladder of thresholds; the first band whose
//! threshold is less than or equal to the final grade wins.

use rust_decimal::Decimal;

use crate::models::{LetterGrade, VerbalGrade};

/// One rung of the grading ladder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GradeBand {
    /// Lowest final grade (inclusive) that falls in this band.
    pub threshold: Decimal,
    /// Letter grade for the band.
    pub letter_grade: LetterGrade,
    /// Verbal grade for the band.
    pub verbal_grade: VerbalGrade,
    /// Grade point on the 4.0 scale.
    pub grade_point: Decimal,
}

const fn tenths(value: u32) -> Decimal {
    Decimal::from_parts(value, 0, 0, false, 1)
}

const fn band(
    threshold: u32,
    letter_grade: LetterGrade,
    verbal_grade: VerbalGrade,
    grade_point: u32,
) -> GradeBand {
    GradeBand {
        threshold: tenths(threshold),
        letter_grade,
        verbal_grade,
        grade_point: tenths(grade_point),
    }
}

/// The grading ladder, highest threshold first.
pub const GRADING_SCALE: [GradeBand; 11] = [
    band(90, LetterGrade::APlus, VerbalGrade::Excellent, 40),
    band(85, LetterGrade::A, VerbalGrade::Excellent, 40),
    band(80, LetterGrade::AMinus, VerbalGrade::Good, 37),
    band(77, LetterGrade::BPlus, VerbalGrade::Good, 33),
    band(70, LetterGrade::B, VerbalGrade::Good, 30),
    band(65, LetterGrade::BMinus, VerbalGrade::Fair, 27),
    band(60, LetterGrade::CPlus, VerbalGrade::Fair, 23),
    band(55, LetterGrade::C, VerbalGrade::Fair, 20),
    band(50, LetterGrade::CMinus, VerbalGrade::Average, 17),
    band(45, LetterGrade::DPlus, VerbalGrade::Average, 13),
    band(40, LetterGrade::D, VerbalGrade::Average, 10),
];

/// The band for everything below the lowest threshold, and for disciplinary failures.
pub const FAILING_BAND: GradeBand = band(0, LetterGrade::F, VerbalGrade::Poor, 0);

/// Looks up the band for a final grade.
///
/// # Examples
///
/// ```
/// use grade_engine::calculation::grade_band;
/// use grade_engine::models::LetterGrade;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let band = grade_band(Decimal::from_str("8.5").unwrap());
/// assert_eq!(band.letter_grade, LetterGrade::A);
///
/// let band = grade_band(Decimal::from_str("3.9").unwrap());
/// assert_eq!(band.letter_grade, LetterGrade::F);
/// ```
pub fn grade_band(final_grade: Decimal) -> GradeBand {
    GRADING_SCALE
        .iter()
        .find(|band| final_grade >= band.threshold)
        .copied()
        .unwrap_or(FAILING_BAND)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_scale_is_strictly_descending() {
        for pair in GRADING_SCALE.windows(2) {
            assert!(pair[0].threshold > pair[1].threshold);
            assert!(pair[0].grade_point >= pair[1].grade_point);
        }
    }

    #[test]
    fn test_every_threshold_maps_to_its_own_band() {
        for band in GRADING_SCALE {
            assert_eq!(grade_band(band.threshold), band);
        }
    }

    #[test]
    fn test_just_below_threshold_falls_to_next_band() {
        let cases = [
            ("8.9", LetterGrade::A),
            ("8.4", LetterGrade::AMinus),
            ("7.9", LetterGrade::BPlus),
            ("7.6", LetterGrade::B),
            ("6.9", LetterGrade::BMinus),
            ("6.4", LetterGrade::CPlus),
            ("5.9", LetterGrade::C),
            ("5.4", LetterGrade::CMinus),
            ("4.9", LetterGrade::DPlus),
            ("4.4", LetterGrade::D),
            ("3.9", LetterGrade::F),
        ];
        for (value, expected) in cases {
            assert_eq!(grade_band(dec(value)).letter_grade, expected, "{value}");
        }
    }

    #[test]
    fn test_full_table_points_and_verbal_grades() {
        let expected = [
            ("10", LetterGrade::APlus, VerbalGrade::Excellent, "4.0"),
            ("8.5", LetterGrade::A, VerbalGrade::Excellent, "4.0"),
            ("8.0", LetterGrade::AMinus, VerbalGrade::Good, "3.7"),
            ("7.7", LetterGrade::BPlus, VerbalGrade::Good, "3.3"),
            ("7.0", LetterGrade::B, VerbalGrade::Good, "3.0"),
            ("6.5", LetterGrade::BMinus, VerbalGrade::Fair, "2.7"),
            ("6.0", LetterGrade::CPlus, VerbalGrade::Fair, "2.3"),
            ("5.5", LetterGrade::C, VerbalGrade::Fair, "2.0"),
            ("5.0", LetterGrade::CMinus, VerbalGrade::Average, "1.7"),
            ("4.5", LetterGrade::DPlus, VerbalGrade::Average, "1.3"),
            ("4.0", LetterGrade::D, VerbalGrade::Average, "1.0"),
            ("0", LetterGrade::F, VerbalGrade::Poor, "0"),
        ];
        for (value, letter, verbal, point) in expected {
            let band = grade_band(dec(value));
            assert_eq!(band.letter_grade, letter, "{value}");
            assert_eq!(band.verbal_grade, verbal, "{value}");
            assert_eq!(band.grade_point, dec(point), "{value}");
        }
    }
}
