//! Grade computation from raw component scores.
//!
//! This module turns three raw scores and a status flag into the four derived
//! grade fields. It is pure: callers persist the result.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{AuditStep, EnrollmentStatus, GradeResult};

use super::grading_scale::{FAILING_BAND, grade_band};
use super::rounding::round_half_up;

/// Weight of `score_a` in the final grade (60%).
pub const SCORE_A_WEIGHT: Decimal = Decimal::from_parts(6, 0, 0, false, 1);

/// Weight of `score_b` in the final grade (30%).
pub const SCORE_B_WEIGHT: Decimal = Decimal::from_parts(3, 0, 0, false, 1);

/// Weight of `score_c` in the final grade (10%).
pub const SCORE_C_WEIGHT: Decimal = Decimal::from_parts(1, 0, 0, false, 1);

/// Computes the weighted final grade, rounded half-up to one decimal place.
///
/// # Examples
///
/// ```
/// use grade_engine::calculation::weighted_final_grade;
/// use rust_decimal::Decimal;
///
/// // 10*0.6 + 0*0.3 + 0*0.1 = 6.0
/// let grade = weighted_final_grade(Decimal::TEN, Decimal::ZERO, Decimal::ZERO);
/// assert_eq!(grade, Decimal::new(60, 1));
/// ```
pub fn weighted_final_grade(score_a: Decimal, score_b: Decimal, score_c: Decimal) -> Decimal {
    let raw = score_a * SCORE_A_WEIGHT + score_b * SCORE_B_WEIGHT + score_c * SCORE_C_WEIGHT;
    round_half_up(raw, 1)
}

/// The derived grade of a disciplinary failure.
pub fn disciplinary_failure() -> GradeResult {
    GradeResult {
        final_grade: Decimal::ZERO,
        letter_grade: FAILING_BAND.letter_grade,
        verbal_grade: FAILING_BAND.verbal_grade,
        grade_point: FAILING_BAND.grade_point,
    }
}

/// Computes the derived grade for three raw scores and a status.
///
/// Rules, in order of precedence:
/// 1. [`EnrollmentStatus::FailedDisciplinary`] always yields `0 / F / Kém / 0.0`.
/// 2. If any score is absent, the grade is not computable and `None` is returned.
/// 3. Otherwise the weighted final grade is looked up on the grading scale.
///
/// Scores are not range-checked here; validation rejects out-of-range input
/// before it reaches the engine.
///
/// # Examples
///
/// ```
/// use grade_engine::calculation::compute_grade;
/// use grade_engine::models::{EnrollmentStatus, LetterGrade};
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let score = Some(Decimal::from_str("8.5").unwrap());
/// let grade = compute_grade(score, score, score, EnrollmentStatus::Normal).unwrap();
/// assert_eq!(grade.letter_grade, LetterGrade::A);
///
/// let pending = compute_grade(score, None, score, EnrollmentStatus::Normal);
/// assert!(pending.is_none());
/// ```
pub fn compute_grade(
    score_a: Option<Decimal>,
    score_b: Option<Decimal>,
    score_c: Option<Decimal>,
    status: EnrollmentStatus,
) -> Option<GradeResult> {
    if status == EnrollmentStatus::FailedDisciplinary {
        return Some(disciplinary_failure());
    }

    let final_grade = weighted_final_grade(score_a?, score_b?, score_c?);
    let band = grade_band(final_grade);

    Some(GradeResult {
        final_grade,
        letter_grade: band.letter_grade,
        verbal_grade: band.verbal_grade,
        grade_point: band.grade_point,
    })
}

/// A grade computation together with the audit steps explaining it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GradeComputation {
    /// The derived grade, or `None` when not computable.
    pub grade: Option<GradeResult>,
    /// The audit steps recording the decision.
    pub audit_steps: Vec<AuditStep>,
}

fn opt_str(value: Option<Decimal>) -> serde_json::Value {
    match value {
        Some(v) => serde_json::Value::String(v.normalize().to_string()),
        None => serde_json::Value::Null,
    }
}

fn status_str(status: EnrollmentStatus) -> &'static str {
    match status {
        EnrollmentStatus::Normal => "normal",
        EnrollmentStatus::FailedDisciplinary => "failed_disciplinary",
    }
}

/// Computes a grade like [`compute_grade`] and records how it was reached.
///
/// Produces one step for the status/missing-data decision and, when the grade
/// is scored, one step each for the weighting and the scale lookup.
/// `step_number` is the number given to the first step.
pub fn compute_grade_audited(
    score_a: Option<Decimal>,
    score_b: Option<Decimal>,
    score_c: Option<Decimal>,
    status: EnrollmentStatus,
    step_number: u32,
) -> GradeComputation {
    let grade = compute_grade(score_a, score_b, score_c, status);
    let inputs = serde_json::json!({
        "score_a": opt_str(score_a),
        "score_b": opt_str(score_b),
        "score_c": opt_str(score_c),
        "status": status_str(status)
    });

    if status == EnrollmentStatus::FailedDisciplinary {
        let audit_step = AuditStep {
            step_number,
            rule_id: "status_override".to_string(),
            rule_name: "Disciplinary Status Override".to_string(),
            input: inputs,
            output: serde_json::json!({
                "final_grade": "0",
                "letter_grade": FAILING_BAND.letter_grade.as_str(),
                "verbal_grade": FAILING_BAND.verbal_grade.label(),
                "grade_point": "0"
            }),
            reasoning: "Record is flagged failed_disciplinary; scores are ignored".to_string(),
        };
        return GradeComputation {
            grade,
            audit_steps: vec![audit_step],
        };
    }

    let Some(result) = grade else {
        let missing: Vec<&str> = [("score_a", score_a), ("score_b", score_b), ("score_c", score_c)]
            .iter()
            .filter(|(_, v)| v.is_none())
            .map(|(name, _)| *name)
            .collect();
        let audit_step = AuditStep {
            step_number,
            rule_id: "missing_scores".to_string(),
            rule_name: "Missing Score Check".to_string(),
            input: inputs,
            output: serde_json::json!({
                "final_grade": null,
                "letter_grade": null,
                "verbal_grade": null,
                "grade_point": null
            }),
            reasoning: format!(
                "Grade not computed: missing {}",
                missing.join(", ")
            ),
        };
        return GradeComputation {
            grade: None,
            audit_steps: vec![audit_step],
        };
    };

    let (a, b, c) = (
        score_a.unwrap_or_default(),
        score_b.unwrap_or_default(),
        score_c.unwrap_or_default(),
    );
    let raw = a * SCORE_A_WEIGHT + b * SCORE_B_WEIGHT + c * SCORE_C_WEIGHT;

    let weighting_step = AuditStep {
        step_number,
        rule_id: "weighted_final_grade".to_string(),
        rule_name: "Weighted Final Grade".to_string(),
        input: inputs,
        output: serde_json::json!({
            "raw": raw.normalize().to_string(),
            "final_grade": result.final_grade.to_string()
        }),
        reasoning: format!(
            "{} x {} + {} x {} + {} x {} = {}, rounded half-up to {}",
            a.normalize(),
            SCORE_A_WEIGHT,
            b.normalize(),
            SCORE_B_WEIGHT,
            c.normalize(),
            SCORE_C_WEIGHT,
            raw.normalize(),
            result.final_grade
        ),
    };

    let band = grade_band(result.final_grade);
    let scale_step = AuditStep {
        step_number: step_number + 1,
        rule_id: "grading_scale".to_string(),
        rule_name: "Grading Scale Lookup".to_string(),
        input: serde_json::json!({
            "final_grade": result.final_grade.to_string()
        }),
        output: serde_json::json!({
            "letter_grade": result.letter_grade.as_str(),
            "verbal_grade": result.verbal_grade.label(),
            "grade_point": result.grade_point.to_string()
        }),
        reasoning: if result.letter_grade == FAILING_BAND.letter_grade {
            format!("{} is below every passing threshold", result.final_grade)
        } else {
            format!(
                "{} >= {} gives {} ({}), {} points",
                result.final_grade,
                band.threshold,
                result.letter_grade,
                result.verbal_grade.description(),
                result.grade_point
            )
        },
    };

    GradeComputation {
        grade,
        audit_steps: vec![weighting_step, scale_step],
    }
}
