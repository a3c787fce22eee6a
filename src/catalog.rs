//! Course catalog.
//!
//! Read-only collection of courses supplied by an external store. The
//! engine only looks courses up; a missing course is fatal for the run
//! that asked for it.

use serde::{Deserialize, Serialize};

use crate::error::{Result, TimetableError};
use crate::models::Course;

/// An ordered collection of courses.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    courses: Vec<Course>,
}

impl Catalog {
    /// Creates a catalog from courses in catalog order.
    pub fn new(courses: Vec<Course>) -> Self {
        Self { courses }
    }

    /// Parses a JSON array of courses.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Adds a course.
    pub fn with_course(mut self, course: Course) -> Self {
        self.courses.push(course);
        self
    }

    /// Looks up a course by exact code.
    ///
    /// # Errors
    /// [`TimetableError::CourseNotFound`] if absent.
    pub fn get(&self, code: &str) -> Result<&Course> {
        self.courses
            .iter()
            .find(|c| c.code == code)
            .ok_or_else(|| TimetableError::CourseNotFound {
                code: code.to_string(),
            })
    }

    /// Looks up several courses, preserving the requested order.
    pub fn get_all<S: AsRef<str>>(&self, codes: &[S]) -> Result<Vec<&Course>> {
        codes.iter().map(|c| self.get(c.as_ref())).collect()
    }

    /// Lab courses (code ends with `suffix`), in catalog order.
    pub fn lab_courses(&self, suffix: &str) -> Vec<&Course> {
        self.courses.iter().filter(|c| c.is_lab(suffix)).collect()
    }

    /// Theory courses (not ending with `suffix`), in catalog order.
    pub fn theory_courses(&self, suffix: &str) -> Vec<&Course> {
        self.courses.iter().filter(|c| !c.is_lab(suffix)).collect()
    }

    /// All courses.
    pub fn courses(&self) -> &[Course] {
        &self.courses
    }

    /// Number of courses.
    pub fn len(&self) -> usize {
        self.courses.len()
    }

    /// Whether the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.courses.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_catalog() -> Catalog {
        Catalog::new(vec![
            Course::new("MAT1002").with_offering("A1+TA1"),
            Course::new("ENG2001L").with_offering("L31+L32"),
            Course::new("ENG2001").with_offering("B1+TB1"),
            Course::new("PHY1007L").with_offering("L4+L5"),
        ])
    }

    #[test]
    fn test_lookup() {
        let cat = sample_catalog();
        assert_eq!(cat.get("ENG2001").unwrap().code, "ENG2001");
        let err = cat.get("CSE2005").unwrap_err();
        assert!(matches!(err, TimetableError::CourseNotFound { ref code } if code == "CSE2005"));
    }

    #[test]
    fn test_get_all_fails_on_first_missing() {
        let cat = sample_catalog();
        let found = cat.get_all(&["PHY1007L", "MAT1002"]).unwrap();
        assert_eq!(found[0].code, "PHY1007L");
        assert!(cat.get_all(&["MAT1002", "X", "Y"]).is_err());
    }

    #[test]
    fn test_lab_and_theory_split() {
        let cat = sample_catalog();
        let labs: Vec<&str> = cat.lab_courses("L").iter().map(|c| c.code.as_str()).collect();
        assert_eq!(labs, vec!["ENG2001L", "PHY1007L"]);
        assert_eq!(cat.theory_courses("L").len(), 2);
    }

    #[test]
    fn test_from_json() {
        let json = r#"[{"code": "MAT1002", "semester": 2, "degree": "ECE",
                        "slotCombos": [{"id": 1, "slotCode": "A1+TA1"}]}]"#;
        let cat = Catalog::from_json(json).unwrap();
        assert_eq!(cat.len(), 1);
        assert_eq!(cat.courses()[0].slot_combinations[0].slot_code, "A1+TA1");
    }
}
