//! Grade categories and derived grade results.
//!
//! This module defines the letter and verbal grade categories produced by the
//! grading scale, and the [`GradeResult`] bundle of derived fields stored on
//! every computed enrollment record.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Ordinal letter grade, from `A+` down to `F`.
///
/// # Example
///
/// ```
/// use grade_engine::models::LetterGrade;
///
/// assert_eq!(LetterGrade::AMinus.as_str(), "A-");
/// assert_eq!(serde_json::to_string(&LetterGrade::BPlus).unwrap(), "\"B+\"");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LetterGrade {
    /// 9.0 and above.
    #[serde(rename = "A+")]
    APlus,
    /// 8.5 to below 9.0.
    #[serde(rename = "A")]
    A,
    /// 8.0 to below 8.5.
    #[serde(rename = "A-")]
    AMinus,
    /// 7.7 to below 8.0.
    #[serde(rename = "B+")]
    BPlus,
    /// 7.0 to below 7.7.
    #[serde(rename = "B")]
    B,
    /// 6.5 to below 7.0.
    #[serde(rename = "B-")]
    BMinus,
    /// 6.0 to below 6.5.
    #[serde(rename = "C+")]
    CPlus,
    /// 5.5 to below 6.0.
    #[serde(rename = "C")]
    C,
    /// 5.0 to below 5.5.
    #[serde(rename = "C-")]
    CMinus,
    /// 4.5 to below 5.0.
    #[serde(rename = "D+")]
    DPlus,
    /// 4.0 to below 4.5.
    #[serde(rename = "D")]
    D,
    /// Below 4.0, or a disciplinary failure.
    #[serde(rename = "F")]
    F,
}

impl LetterGrade {
    /// Returns the conventional textual form of the grade (e.g. `"B+"`).
    pub fn as_str(&self) -> &'static str {
        match self {
            LetterGrade::APlus => "A+",
            LetterGrade::A => "A",
            LetterGrade::AMinus => "A-",
            LetterGrade::BPlus => "B+",
            LetterGrade::B => "B",
            LetterGrade::BMinus => "B-",
            LetterGrade::CPlus => "C+",
            LetterGrade::C => "C",
            LetterGrade::CMinus => "C-",
            LetterGrade::DPlus => "D+",
            LetterGrade::D => "D",
            LetterGrade::F => "F",
        }
    }
}

impl fmt::Display for LetterGrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Coarse descriptive grade category.
///
/// Serialized with the Vietnamese labels used by existing clients
/// (`"Xuất sắc"`, `"Giỏi"`, `"Khá"`, `"Trung bình"`, `"Kém"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VerbalGrade {
    /// Xuất sắc.
    #[serde(rename = "Xuất sắc")]
    Excellent,
    /// Giỏi.
    #[serde(rename = "Giỏi")]
    Good,
    /// Khá.
    #[serde(rename = "Khá")]
    Fair,
    /// Trung bình.
    #[serde(rename = "Trung bình")]
    Average,
    /// Kém.
    #[serde(rename = "Kém")]
    Poor,
}

impl VerbalGrade {
    /// Returns the label stored and sent over the wire.
    pub fn label(&self) -> &'static str {
        match self {
            VerbalGrade::Excellent => "Xuất sắc",
            VerbalGrade::Good => "Giỏi",
            VerbalGrade::Fair => "Khá",
            VerbalGrade::Average => "Trung bình",
            VerbalGrade::Poor => "Kém",
        }
    }

    /// Returns the English description of the category.
    pub fn description(&self) -> &'static str {
        match self {
            VerbalGrade::Excellent => "Excellent",
            VerbalGrade::Good => "Good",
            VerbalGrade::Fair => "Fair",
            VerbalGrade::Average => "Average",
            VerbalGrade::Poor => "Poor",
        }
    }
}

impl fmt::Display for VerbalGrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The four derived fields of a computed grade.
///
/// A `GradeResult` only exists when a grade could be computed; an enrollment
/// whose grade is not yet computable holds `None` instead, so the four fields
/// are always present or absent together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GradeResult {
    /// Weighted final grade on the 10-point scale, one decimal place.
    pub final_grade: Decimal,
    /// Letter grade from the grading scale.
    pub letter_grade: LetterGrade,
    /// Verbal grade from the grading scale.
    pub verbal_grade: VerbalGrade,
    /// Grade point on the 4.0 scale.
    pub grade_point: Decimal,
}

/// Wire form of the derived fields, with explicit nulls.
///
/// Used wherever derived fields are serialized next to other record data,
/// so that a not-yet-computed grade shows up as four `null`s.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DerivedGrade {
    /// Weighted final grade, if computed.
    pub final_grade: Option<Decimal>,
    /// Letter grade, if computed.
    pub letter_grade: Option<LetterGrade>,
    /// Verbal grade, if computed.
    pub verbal_grade: Option<VerbalGrade>,
    /// Grade point, if computed.
    pub grade_point: Option<Decimal>,
}

impl DerivedGrade {
    /// Returns true when none of the derived fields are populated.
    pub fn is_pending(&self) -> bool {
        self.final_grade.is_none()
    }
}

impl From<Option<GradeResult>> for DerivedGrade {
    fn from(grade: Option<GradeResult>) -> Self {
        match grade {
            Some(g) => DerivedGrade {
                final_grade: Some(g.final_grade),
                letter_grade: Some(g.letter_grade),
                verbal_grade: Some(g.verbal_grade),
                grade_point: Some(g.grade_point),
            },
            None => DerivedGrade::default(),
        }
    }
}
