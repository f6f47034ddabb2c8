//! # Course Storage
//!
//! Persistence is an external collaborator of the editor. The editor only
//! sees the narrow [`CourseStore`] interface; [`FileCourseStore`] keeps one
//! JSON snapshot per course on disk and [`MemoryCourseStore`] is used in
//! tests, with switches to simulate an unavailable backend.

use coursecraft_common::{CommonError, CommonResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::document::DocumentSnapshot;

/// Entry in the course list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseSummary {
    pub course_id: String,
    pub title: String,
    pub block_count: usize,
}

impl From<&DocumentSnapshot> for CourseSummary {
    fn from(snapshot: &DocumentSnapshot) -> Self {
        Self {
            course_id: snapshot.course_id.clone(),
            title: snapshot.title.clone(),
            block_count: snapshot.blocks.len(),
        }
    }
}

/// Backend for loading and saving courses
pub trait CourseStore {
    /// Fetch the current course list
    fn list_courses(&self) -> CommonResult<Vec<CourseSummary>>;

    fn load_course(&self, course_id: &str) -> CommonResult<DocumentSnapshot>;

    fn save_course(&self, snapshot: &DocumentSnapshot) -> CommonResult<()>;
}

/// One `<course-id>.json` file per course under `root`
#[derive(Debug, Clone)]
pub struct FileCourseStore {
    root: PathBuf,
}

impl FileCourseStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn course_path(&self, course_id: &str) -> CommonResult<PathBuf> {
        let valid = !course_id.is_empty()
            && course_id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(CommonError::Generic(format!("Invalid course id: {:?}", course_id)));
        }
        Ok(self.root.join(format!("{}.json", course_id)))
    }
}

impl CourseStore for FileCourseStore {
    fn list_courses(&self) -> CommonResult<Vec<CourseSummary>> {
        if !self.root.exists() {
            return Ok(Vec::new());
        }

        let mut courses = Vec::new();
        for entry in std::fs::read_dir(&self.root)? {
            let path = entry?.path();
            if path.extension().map(|e| e == "json").unwrap_or(false) {
                let content = std::fs::read_to_string(&path)?;
                match serde_json::from_str::<DocumentSnapshot>(&content) {
                    Ok(snapshot) => courses.push(CourseSummary::from(&snapshot)),
                    Err(e) => tracing::warn!("Skipping unreadable course {:?}: {}", path, e),
                }
            }
        }
        courses.sort_by(|a, b| a.course_id.cmp(&b.course_id));

        Ok(courses)
    }

    fn load_course(&self, course_id: &str) -> CommonResult<DocumentSnapshot> {
        let path = self.course_path(course_id)?;
        if !path.exists() {
            return Err(CommonError::NotFound(course_id.to_string()));
        }
        let content = std::fs::read_to_string(&path)?;
        Ok(serde_json::from_str(&content)?)
    }

    fn save_course(&self, snapshot: &DocumentSnapshot) -> CommonResult<()> {
        let path = self.course_path(&snapshot.course_id)?;
        std::fs::create_dir_all(&self.root)?;
        let content = serde_json::to_string_pretty(snapshot)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

/// In-memory store for tests
#[derive(Debug, Default)]
pub struct MemoryCourseStore {
    courses: Mutex<BTreeMap<String, DocumentSnapshot>>,
    fail_loads: bool,
    fail_saves: bool,
}

impl MemoryCourseStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store whose every load fails
    pub fn failing_loads(mut self) -> Self {
        self.fail_loads = true;
        self
    }

    /// Store whose every save fails
    pub fn failing_saves(mut self) -> Self {
        self.fail_saves = true;
        self
    }

    pub fn insert(&self, snapshot: DocumentSnapshot) {
        if let Ok(mut courses) = self.courses.lock() {
            courses.insert(snapshot.course_id.clone(), snapshot);
        }
    }

    pub fn get(&self, course_id: &str) -> Option<DocumentSnapshot> {
        self.courses.lock().ok()?.get(course_id).cloned()
    }

    fn courses(
        &self,
    ) -> CommonResult<std::sync::MutexGuard<'_, BTreeMap<String, DocumentSnapshot>>> {
        self.courses
            .lock()
            .map_err(|_| CommonError::Unavailable("memory store poisoned".to_string()))
    }
}

impl CourseStore for MemoryCourseStore {
    fn list_courses(&self) -> CommonResult<Vec<CourseSummary>> {
        Ok(self.courses()?.values().map(CourseSummary::from).collect())
    }

    fn load_course(&self, course_id: &str) -> CommonResult<DocumentSnapshot> {
        if self.fail_loads {
            return Err(CommonError::Unavailable("load failed".to_string()));
        }
        self.courses()?
            .get(course_id)
            .cloned()
            .ok_or_else(|| CommonError::NotFound(course_id.to_string()))
    }

    fn save_course(&self, snapshot: &DocumentSnapshot) -> CommonResult<()> {
        if self.fail_saves {
            return Err(CommonError::Unavailable("save failed".to_string()));
        }
        self.courses()?
            .insert(snapshot.course_id.clone(), snapshot.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::BlockKind;
    use crate::document::BlockDocument;

    fn sample() -> DocumentSnapshot {
        let mut doc = BlockDocument::new("basic-tech");
        doc.set_title("Definition Of Basic Technology");
        doc.add_block(BlockKind::Text, None).unwrap();
        doc.add_block(BlockKind::Quiz, None).unwrap();
        doc.snapshot()
    }

    #[test]
    fn test_file_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileCourseStore::new(dir.path().join("courses"));

        assert!(store.list_courses().unwrap().is_empty());

        let snapshot = sample();
        store.save_course(&snapshot).unwrap();

        let loaded = store.load_course("basic-tech").unwrap();
        assert_eq!(loaded, snapshot);

        let list = store.list_courses().unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].block_count, 2);
    }

    #[test]
    fn test_file_store_missing_course() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileCourseStore::new(dir.path());

        assert!(matches!(
            store.load_course("nothing-here"),
            Err(CommonError::NotFound(_))
        ));
    }

    #[test]
    fn test_file_store_rejects_path_like_ids() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileCourseStore::new(dir.path());

        assert!(store.load_course("../etc/passwd").is_err());
    }

    #[test]
    fn test_memory_store_failures() {
        let store = MemoryCourseStore::new().failing_saves();
        assert!(store.save_course(&sample()).is_err());

        let store = MemoryCourseStore::new().failing_loads();
        store.insert(sample());
        assert!(store.load_course("basic-tech").is_err());
    }
}
