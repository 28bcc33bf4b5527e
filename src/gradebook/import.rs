//! Bulk import of enrollment rows.
//!
//! Rows are validated one by one; a bad row is reported with its number and
//! never stops the rest. Valid rows are written in batches of
//! `import.batch_size`.

use std::collections::HashSet;

use chrono::Utc;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{EngineError, EngineResult};
use crate::models::{Enrollment, EnrollmentKey, NewEnrollment};
use crate::validation::validate_enrollment;

use super::Gradebook;

/// One spreadsheet row of an import.
///
/// Column names follow the gradebook's field names; the spreadsheet headers
/// used by existing exports (`maSV`, `maLop`, `maMonHoc`, `diemA`...) are
/// accepted as aliases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportRow {
    /// Student identifier.
    #[serde(alias = "maSV")]
    pub student_id: String,
    /// Class-section identifier.
    #[serde(alias = "maLop")]
    pub class_id: String,
    /// Course identifier.
    #[serde(alias = "maMonHoc")]
    pub course_id: String,
    /// Semester code.
    pub semester: String,
    /// Component weighted at 60%.
    #[serde(default, alias = "diemA")]
    pub score_a: Option<Decimal>,
    /// Component weighted at 30%.
    #[serde(default, alias = "diemB")]
    pub score_b: Option<Decimal>,
    /// Component weighted at 10%.
    #[serde(default, alias = "diemC")]
    pub score_c: Option<Decimal>,
}

impl From<ImportRow> for NewEnrollment {
    fn from(row: ImportRow) -> Self {
        NewEnrollment {
            student_id: row.student_id,
            course_id: row.course_id,
            class_id: row.class_id,
            semester: row.semester,
            score_a: row.score_a,
            score_b: row.score_b,
            score_c: row.score_c,
        }
    }
}

/// Why one row was not imported.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowError {
    /// Row number, counting data rows from 1.
    pub row: usize,
    /// What was wrong with the row.
    pub message: String,
}

/// The outcome of an import.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ImportReport {
    /// Number of rows written.
    pub imported: usize,
    /// Rows that were rejected.
    pub errors: Vec<RowError>,
}

impl Gradebook {
    /// Imports enrollment rows, reporting per-row failures.
    ///
    /// A row is rejected if it fails validation, references a missing student,
    /// class or course, or repeats a key that is already stored or appeared
    /// earlier in the same import. Only repository failures abort the import.
    pub fn import_enrollments(&self, rows: Vec<ImportRow>) -> EngineResult<ImportReport> {
        let batch_size = self.settings.import.batch_size.max(1);
        let total_rows = rows.len();
        let mut report = ImportReport::default();
        let mut seen: HashSet<EnrollmentKey> = HashSet::new();
        let mut batch: Vec<(usize, Enrollment)> = Vec::with_capacity(batch_size.min(total_rows));

        for (index, row) in rows.into_iter().enumerate() {
            let row_number = index + 1;
            match self.prepare_row(row.into(), &mut seen) {
                Ok(enrollment) => batch.push((row_number, enrollment)),
                Err(err @ EngineError::Repository { .. }) => return Err(err),
                Err(err) => report.errors.push(RowError {
                    row: row_number,
                    message: err.to_string(),
                }),
            }

            if batch.len() >= batch_size {
                self.flush(&mut batch, &mut report)?;
            }
        }
        self.flush(&mut batch, &mut report)?;

        report.errors.sort_by_key(|e| e.row);
        info!(
            total_rows,
            imported = report.imported,
            rejected = report.errors.len(),
            "Imported enrollment rows"
        );
        Ok(report)
    }

    fn prepare_row(
        &self,
        input: NewEnrollment,
        seen: &mut HashSet<EnrollmentKey>,
    ) -> EngineResult<Enrollment> {
        validate_enrollment(&input)?;
        let key = self.resolve_key(&input)?;

        let duplicate = || EngineError::DuplicateEnrollment {
            student_id: key.student_id.clone(),
            course_id: key.course_id.clone(),
            class_id: key.class_id.clone(),
            semester: key.semester.to_string(),
        };
        if seen.contains(&key) || self.repos.enrollments.find_by_key(&key)?.is_some() {
            return Err(duplicate());
        }
        seen.insert(key.clone());

        Ok(Enrollment::new(key, input.scores(), Utc::now()))
    }

    /// Writes the pending batch. If the batch write is refused because a key
    /// was taken in the meantime, the rows are retried one at a time so only
    /// the conflicting rows are reported.
    fn flush(
        &self,
        batch: &mut Vec<(usize, Enrollment)>,
        report: &mut ImportReport,
    ) -> EngineResult<()> {
        if batch.is_empty() {
            return Ok(());
        }
        let pending = std::mem::take(batch);
        let enrollments: Vec<Enrollment> = pending.iter().map(|(_, e)| e.clone()).collect();

        match self.repos.enrollments.insert_enrollments(enrollments) {
            Ok(count) => {
                report.imported += count;
                Ok(())
            }
            Err(EngineError::DuplicateEnrollment { .. }) => {
                warn!(rows = pending.len(), "Batch write conflicted; inserting rows individually");
                for (row, enrollment) in pending {
                    match self.repos.enrollments.insert_enrollment(enrollment) {
                        Ok(_) => report.imported += 1,
                        Err(err @ EngineError::DuplicateEnrollment { .. }) => {
                            report.errors.push(RowError {
                                row,
                                message: err.to_string(),
                            });
                        }
                        Err(err) => return Err(err),
                    }
                }
                Ok(())
            }
            Err(err) => Err(err),
        }
    }
}
