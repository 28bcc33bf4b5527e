//! Semester term codes.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A semester term code such as `HK1-2024`.
///
/// The code is `HK` followed by the term number (1 to 3), a dash and a
/// four-digit year in the 2000s.
///
/// # Example
///
/// ```
/// use grade_engine::models::Semester;
///
/// let semester: Semester = "HK2-2024".parse().unwrap();
/// assert_eq!(semester.term(), 2);
/// assert_eq!(semester.year(), 2024);
/// assert_eq!(semester.to_string(), "HK2-2024");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Semester {
    year: u16,
    term: u8,
}

impl Semester {
    /// Returns the term number within the academic year (1 to 3).
    pub fn term(&self) -> u8 {
        self.term
    }

    /// Returns the calendar year of the term.
    pub fn year(&self) -> u16 {
        self.year
    }

    /// Case-insensitive substring match against the term code.
    ///
    /// `"2024"` matches every 2024 term, `"hk1-2024"` matches exactly one.
    pub fn matches(&self, filter: &str) -> bool {
        let filter = filter.trim();
        filter.is_empty()
            || self
                .to_string()
                .to_lowercase()
                .contains(&filter.to_lowercase())
    }
}

impl fmt::Display for Semester {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HK{}-{}", self.term, self.year)
    }
}

/// Error returned when a term code is malformed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid semester '{0}', expected HK<1-3>-20<yy>")]
pub struct InvalidSemester(pub String);

impl FromStr for Semester {
    type Err = InvalidSemester;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || InvalidSemester(s.to_string());

        let rest = s.strip_prefix("HK").ok_or_else(invalid)?;
        let (term, year) = rest.split_once('-').ok_or_else(invalid)?;

        let term = match term {
            "1" => 1,
            "2" => 2,
            "3" => 3,
            _ => return Err(invalid()),
        };

        if year.len() != 4 || !year.starts_with("20") || !year.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(invalid());
        }
        let year = year.parse::<u16>().map_err(|_| invalid())?;

        Ok(Semester { year, term })
    }
}

impl TryFrom<String> for Semester {
    type Error = InvalidSemester;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Semester> for String {
    fn from(semester: Semester) -> Self {
        semester.to_string()
    }
}
