//! Audit trail models.
//!
//! Grade computations can be recorded as a sequence of [`AuditStep`]s so a
//! caller can see which rule produced each derived field and why.

use serde::{Deserialize, Serialize};

/// A single step in the audit trace recording a calculation decision.
///
/// Each step captures the input, output, and reasoning for a rule application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStep {
    /// The sequential step number.
    pub step_number: u32,
    /// The unique identifier of the rule that was applied.
    pub rule_id: String,
    /// The human-readable name of the rule.
    pub rule_name: String,
    /// The input data for this step.
    pub input: serde_json::Value,
    /// The output data from this step.
    pub output: serde_json::Value,
    /// Human-readable explanation of the decision.
    pub reasoning: String,
}

/// A warning generated during a computation.
///
/// Warnings flag soft failures that do not stop the computation, such as a
/// grade whose course is missing from the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditWarning {
    /// A code identifying the type of warning.
    pub code: String,
    /// A human-readable description of the warning.
    pub message: String,
}

/// The complete audit trace for a computation.
///
/// # Example
///
/// ```
/// use grade_engine::models::AuditTrace;
///
/// let trace = AuditTrace {
///     steps: vec![],
///     warnings: vec![],
///     duration_us: 12,
/// };
/// assert!(trace.steps.is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditTrace {
    /// The sequence of calculation steps.
    pub steps: Vec<AuditStep>,
    /// Any warnings generated during calculation.
    pub warnings: Vec<AuditWarning>,
    /// The total calculation duration in microseconds.
    pub duration_us: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_audit_step_serialization() {
        let step = AuditStep {
            step_number: 1,
            rule_id: "weighted_final_grade".to_string(),
            rule_name: "Weighted Final Grade".to_string(),
            input: serde_json::json!({"score_a": "8"}),
            output: serde_json::json!({"final_grade": "4.8"}),
            reasoning: "8 x 0.6 = 4.8".to_string(),
        };

        let json = serde_json::to_value(&step).unwrap();
        assert_eq!(json["step_number"], 1);
        assert_eq!(json["rule_id"], "weighted_final_grade");
        assert_eq!(json["output"]["final_grade"], "4.8");
    }

    #[test]
    fn test_audit_trace_roundtrip() {
        let trace = AuditTrace {
            steps: vec![],
            warnings: vec![AuditWarning {
                code: "COURSE_NOT_FOUND".to_string(),
                message: "Course MH00999 is not in the catalog".to_string(),
            }],
            duration_us: 42,
        };

        let json = serde_json::to_string(&trace).unwrap();
        let parsed: AuditTrace = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, trace);
    }
}
