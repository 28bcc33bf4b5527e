//! Property tests for grade computation.

use grade_engine::calculation::{compute_grade, disciplinary_failure, grade_band};
use grade_engine::models::{EnrollmentStatus, LetterGrade, VerbalGrade};
use proptest::prelude::*;
use proptest::test_runner::Config;
use rust_decimal::Decimal;

/// A score in [0, 10] with up to two decimal places.
fn score() -> impl Strategy<Value = Decimal> {
    (0_i64..=1000).prop_map(|hundredths| Decimal::new(hundredths, 2))
}

fn status() -> impl Strategy<Value = EnrollmentStatus> {
    prop_oneof![
        Just(EnrollmentStatus::Normal),
        Just(EnrollmentStatus::FailedDisciplinary),
    ]
}

proptest! {
    #![proptest_config(Config::with_cases(256))]

    #[test]
    fn compute_grade_is_deterministic(
        a in proptest::option::of(score()),
        b in proptest::option::of(score()),
        c in proptest::option::of(score()),
        status in status()
    ) {
        prop_assert_eq!(compute_grade(a, b, c, status), compute_grade(a, b, c, status));
    }

    #[test]
    fn disciplinary_status_always_fails(
        a in proptest::option::of(score()),
        b in proptest::option::of(score()),
        c in proptest::option::of(score())
    ) {
        let grade = compute_grade(a, b, c, EnrollmentStatus::FailedDisciplinary);
        prop_assert_eq!(grade, Some(disciplinary_failure()));
        let grade = grade.unwrap();
        prop_assert_eq!(grade.final_grade, Decimal::ZERO);
        prop_assert_eq!(grade.letter_grade, LetterGrade::F);
        prop_assert_eq!(grade.verbal_grade, VerbalGrade::Poor);
        prop_assert_eq!(grade.grade_point, Decimal::ZERO);
    }

    #[test]
    fn any_missing_score_leaves_grade_pending(
        a in score(),
        b in score(),
        missing in 0_usize..3
    ) {
        let mut scores = [Some(a), Some(b), Some(a)];
        scores[missing] = None;
        prop_assert!(
            compute_grade(scores[0], scores[1], scores[2], EnrollmentStatus::Normal).is_none()
        );
    }

    #[test]
    fn final_grade_in_range_with_one_decimal(a in score(), b in score(), c in score()) {
        let grade = compute_grade(Some(a), Some(b), Some(c), EnrollmentStatus::Normal).unwrap();
        prop_assert!(grade.final_grade >= Decimal::ZERO);
        prop_assert!(grade.final_grade <= Decimal::TEN);
        prop_assert!(grade.final_grade.scale() <= 1);
        prop_assert_eq!(grade_band(grade.final_grade).letter_grade, grade.letter_grade);
    }

    #[test]
    fn raising_a_score_never_lowers_the_grade(
        a in score(),
        b in score(),
        c in score(),
        bump in score()
    ) {
        let raised = (a + bump).min(Decimal::TEN);
        let before = compute_grade(Some(a), Some(b), Some(c), EnrollmentStatus::Normal).unwrap();
        let after = compute_grade(Some(raised), Some(b), Some(c), EnrollmentStatus::Normal).unwrap();
        prop_assert!(after.final_grade >= before.final_grade);
        prop_assert!(after.grade_point >= before.grade_point);
    }
}
