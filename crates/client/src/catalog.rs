//! In-memory course catalog state shared by the catalog, detail and player
//! views.

use std::collections::HashMap;

use serde_json::{Map, Value};

use learnhub_core::{CourseId, DomainError, DomainResult, Entity};

use crate::models::{Course, Progress};

#[derive(Debug, Clone, Default)]
pub struct CourseCatalog {
    courses: Vec<Course>,
    selected: Option<Course>,
    progress: HashMap<CourseId, Progress>,
}

impl CourseCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn courses(&self) -> &[Course] {
        &self.courses
    }

    pub fn get(&self, id: &CourseId) -> Option<&Course> {
        self.courses.iter().find(|c| c.id() == id)
    }

    pub fn selected(&self) -> Option<&Course> {
        self.selected.as_ref()
    }

    pub fn progress(&self, id: &CourseId) -> Option<&Progress> {
        self.progress.get(id)
    }

    pub fn set_courses(&mut self, courses: Vec<Course>) {
        self.courses = courses;
    }

    pub fn select_course(&mut self, course: Option<Course>) {
        self.selected = course;
    }

    /// Replace the whole progress map.
    pub fn set_progress(&mut self, progress: HashMap<CourseId, Progress>) {
        self.progress = progress;
    }

    pub fn add_course(&mut self, course: Course) {
        self.courses.push(course);
    }

    /// Shallow-merge `patch` into every course with `id`.
    ///
    /// A patch that would leave a course unreadable is rejected as a whole.
    /// The selected course is a separate copy and is not touched.
    pub fn update_course(&mut self, id: &CourseId, patch: &Map<String, Value>) -> DomainResult<()> {
        let mut merged = Vec::new();
        for (index, course) in self.courses.iter().enumerate() {
            if course.id() == id {
                let next = course
                    .merged(patch)
                    .map_err(|e| DomainError::validation(e.to_string()))?;
                merged.push((index, next));
            }
        }
        if merged.is_empty() {
            return Err(DomainError::not_found());
        }
        for (index, next) in merged {
            self.courses[index] = next;
        }
        Ok(())
    }

    /// Remove every course with `id`.
    pub fn delete_course(&mut self, id: &CourseId) -> DomainResult<()> {
        let before = self.courses.len();
        self.courses.retain(|c| c.id() != id);
        if self.courses.len() == before {
            return Err(DomainError::not_found());
        }
        Ok(())
    }

    pub fn update_progress(&mut self, id: CourseId, progress: Progress) {
        self.progress.insert(id, progress);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn course(id: &str, title: &str) -> Course {
        serde_json::from_value(json!({ "id": id, "title": title, "price": 10 })).unwrap()
    }

    #[test]
    fn add_update_delete() {
        let mut catalog = CourseCatalog::new();
        catalog.set_courses(vec![course("1", "Rust"), course("2", "Go")]);
        catalog.add_course(course("3", "Zig"));
        assert_eq!(catalog.courses().len(), 3);

        let patch = json!({ "title": "Rust 2024", "price": 0 });
        catalog
            .update_course(&CourseId::new("1"), patch.as_object().unwrap())
            .unwrap();
        let updated = catalog.get(&CourseId::new("1")).unwrap();
        assert_eq!(updated.title, "Rust 2024");
        assert_eq!(updated.price, 0.0);
        assert_eq!(catalog.get(&CourseId::new("2")).unwrap().title, "Go");

        catalog.delete_course(&CourseId::new("2")).unwrap();
        assert!(catalog.get(&CourseId::new("2")).is_none());
        assert_eq!(catalog.delete_course(&CourseId::new("2")), Err(DomainError::NotFound));
    }

    #[test]
    fn update_of_unknown_course_is_not_found() {
        let mut catalog = CourseCatalog::new();
        let patch = json!({ "title": "x" });
        assert_eq!(
            catalog.update_course(&CourseId::new("9"), patch.as_object().unwrap()),
            Err(DomainError::NotFound)
        );
    }

    #[test]
    fn bad_patch_leaves_course_untouched() {
        let mut catalog = CourseCatalog::new();
        catalog.add_course(course("1", "Rust"));
        let patch = json!({ "title": 42 });
        let result = catalog.update_course(&CourseId::new("1"), patch.as_object().unwrap());
        assert!(matches!(result, Err(DomainError::Validation(_))));
        assert_eq!(catalog.courses()[0].title, "Rust");
    }

    #[test]
    fn selection_and_progress() {
        let mut catalog = CourseCatalog::new();
        catalog.select_course(Some(course("1", "Rust")));
        assert_eq!(catalog.selected().map(|c| c.title.as_str()), Some("Rust"));

        let progress = Progress {
            progress: 50.0,
            ..Progress::default()
        };
        catalog.update_progress(CourseId::new("1"), progress.clone());
        assert_eq!(catalog.progress(&CourseId::new("1")), Some(&progress));

        catalog.set_progress(HashMap::new());
        assert!(catalog.progress(&CourseId::new("1")).is_none());
    }
}
