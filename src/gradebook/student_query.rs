//! Filtering and ordering for the student listing.

use std::cmp::Ordering;
use std::str::FromStr;

use crate::models::Student;
use crate::validation::ValidationErrors;

/// Filter for listing students. Empty fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StudentFilter {
    /// Case-insensitive substring of the student id.
    pub student_id: Option<String>,
    /// Case-insensitive substring of the name.
    pub name: Option<String>,
    /// Case-insensitive substring of the home class name.
    pub class_name: Option<String>,
    /// Accepted faculties; empty accepts all.
    pub faculties: Vec<String>,
    /// Exact cohort start year.
    pub cohort_year: Option<u16>,
}

fn contains_ignore_case(haystack: &str, needle: Option<&str>) -> bool {
    needle.is_none_or(|n| haystack.to_lowercase().contains(&n.to_lowercase()))
}

impl StudentFilter {
    /// Returns true if `student` passes the filter.
    pub fn matches(&self, student: &Student) -> bool {
        contains_ignore_case(&student.student_id, self.student_id.as_deref())
            && contains_ignore_case(&student.name, self.name.as_deref())
            && contains_ignore_case(&student.class_name, self.class_name.as_deref())
            && (self.faculties.is_empty() || self.faculties.iter().any(|f| *f == student.faculty))
            && self.cohort_year.is_none_or(|year| student.cohort_year == year)
    }
}

/// Student field a listing can be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StudentSortField {
    /// Student id.
    #[default]
    StudentId,
    /// Display name.
    Name,
    /// Home class name.
    ClassName,
    /// Faculty.
    Faculty,
    /// Cohort start year.
    CohortYear,
}

/// Ordering of a student listing, written `field:direction` on the wire
/// (`name:-1`, `cohort_year:desc`). The direction defaults to ascending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StudentSort {
    /// Field to order by.
    pub field: StudentSortField,
    /// Descending when true.
    pub descending: bool,
}

impl StudentSort {
    /// Compares two students; equal keys fall back to the student id.
    pub fn compare(&self, a: &Student, b: &Student) -> Ordering {
        let ordering = match self.field {
            StudentSortField::StudentId => a.student_id.cmp(&b.student_id),
            StudentSortField::Name => a.name.cmp(&b.name),
            StudentSortField::ClassName => a.class_name.cmp(&b.class_name),
            StudentSortField::Faculty => a.faculty.cmp(&b.faculty),
            StudentSortField::CohortYear => a.cohort_year.cmp(&b.cohort_year),
        }
        .then_with(|| a.student_id.cmp(&b.student_id));
        if self.descending {
            ordering.reverse()
        } else {
            ordering
        }
    }
}

impl FromStr for StudentSort {
    type Err = ValidationErrors;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (field, direction) = s.trim().split_once(':').unwrap_or((s.trim(), "1"));
        let field = match field {
            "student_id" => StudentSortField::StudentId,
            "name" => StudentSortField::Name,
            "class_name" => StudentSortField::ClassName,
            "faculty" => StudentSortField::Faculty,
            "cohort_year" => StudentSortField::CohortYear,
            other => {
                return Err(ValidationErrors::single(
                    "sort",
                    format!("cannot sort by '{}'", other),
                ));
            }
        };
        let descending = match direction {
            "1" | "asc" => false,
            "-1" | "desc" => true,
            other => {
                return Err(ValidationErrors::single(
                    "sort",
                    format!("unknown direction '{}', expected 1, -1, asc or desc", other),
                ));
            }
        };
        Ok(StudentSort { field, descending })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn student(id: &str, name: &str, faculty: &str, cohort_year: u16) -> Student {
        Student {
            student_id: id.to_string(),
            name: name.to_string(),
            class_name: "CNTT01".to_string(),
            faculty: faculty.to_string(),
            cohort_year,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_filter_substrings_ignore_case() {
        let an = student("SV00001", "Nguyen Van An", "CNTT", 2022);
        let filter = StudentFilter {
            name: Some("van an".to_string()),
            class_name: Some("cntt".to_string()),
            ..Default::default()
        };
        assert!(filter.matches(&an));

        let filter = StudentFilter {
            student_id: Some("sv0002".to_string()),
            ..Default::default()
        };
        assert!(!filter.matches(&an));
    }

    #[test]
    fn test_filter_faculty_list_and_cohort() {
        let an = student("SV00001", "Nguyen Van An", "CNTT", 2022);
        let filter = StudentFilter {
            faculties: vec!["Luật".to_string(), "CNTT".to_string()],
            cohort_year: Some(2022),
            ..Default::default()
        };
        assert!(filter.matches(&an));

        let filter = StudentFilter {
            faculties: vec!["Luật".to_string()],
            ..Default::default()
        };
        assert!(!filter.matches(&an));
        assert!(StudentFilter::default().matches(&an));
    }

    #[test]
    fn test_parse_sort() {
        assert_eq!(
            "name:-1".parse::<StudentSort>().unwrap(),
            StudentSort {
                field: StudentSortField::Name,
                descending: true
            }
        );
        assert_eq!(
            "cohort_year".parse::<StudentSort>().unwrap(),
            StudentSort {
                field: StudentSortField::CohortYear,
                descending: false
            }
        );
        assert!("password:1".parse::<StudentSort>().unwrap_err().has_field("sort"));
        assert!("name:up".parse::<StudentSort>().is_err());
    }

    #[test]
    fn test_compare_breaks_ties_by_id() {
        let a = student("SV00001", "Binh", "CNTT", 2022);
        let b = student("SV00002", "Binh", "CNTT", 2021);
        let sort = StudentSort {
            field: StudentSortField::Name,
            descending: false,
        };
        assert_eq!(sort.compare(&a, &b), Ordering::Less);

        let sort = StudentSort {
            field: StudentSortField::CohortYear,
            descending: true,
        };
        assert_eq!(sort.compare(&a, &b), Ordering::Less);
    }
}
