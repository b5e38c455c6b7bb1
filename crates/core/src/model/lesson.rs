use thiserror::Error;

use crate::model::ids::LessonId;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum LessonError {
    #[error("lesson title cannot be empty")]
    EmptyTitle,

    #[error("lesson level must be >= 1")]
    InvalidLevel,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CatalogError {
    #[error("catalog must contain at least one lesson")]
    Empty,

    #[error("duplicate lesson id: {0}")]
    DuplicateLessonId(LessonId),

    #[error("duplicate lesson level: {0}")]
    DuplicateLevel(u32),
}

//
// ─── LESSON ────────────────────────────────────────────────────────────────────
//

/// A unit of curriculum content, ordered by an integer level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lesson {
    id: LessonId,
    title: String,
    description: Option<String>,
    level: u32,
}

impl Lesson {
    /// Creates a new Lesson.
    ///
    /// # Errors
    ///
    /// Returns `LessonError::EmptyTitle` if the title is blank and
    /// `LessonError::InvalidLevel` if the level is zero.
    pub fn new(
        id: LessonId,
        title: impl Into<String>,
        description: Option<String>,
        level: u32,
    ) -> Result<Self, LessonError> {
        let title = title.into().trim().to_owned();
        if title.is_empty() {
            return Err(LessonError::EmptyTitle);
        }
        if level == 0 {
            return Err(LessonError::InvalidLevel);
        }

        let description = description
            .map(|d| d.trim().to_owned())
            .filter(|d| !d.is_empty());

        Ok(Self {
            id,
            title,
            description,
            level,
        })
    }

    // Accessors
    #[must_use]
    pub fn id(&self) -> &LessonId {
        &self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    #[must_use]
    pub fn level(&self) -> u32 {
        self.level
    }
}

//
// ─── CATALOG ───────────────────────────────────────────────────────────────────
//

/// The statically ordered lesson list for one curriculum.
///
/// Lessons are kept sorted by level; the lowest level is the curriculum
/// entry point and is always accessible.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    lessons: Vec<Lesson>,
}

impl Catalog {
    /// Builds a catalog from a lesson list, sorting it by level.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Empty` for an empty list and a duplicate
    /// error when two lessons share an id or a level.
    pub fn new(mut lessons: Vec<Lesson>) -> Result<Self, CatalogError> {
        if lessons.is_empty() {
            return Err(CatalogError::Empty);
        }

        lessons.sort_by_key(Lesson::level);

        for pair in lessons.windows(2) {
            if pair[0].level() == pair[1].level() {
                return Err(CatalogError::DuplicateLevel(pair[0].level()));
            }
        }
        for (idx, lesson) in lessons.iter().enumerate() {
            if lessons[..idx].iter().any(|l| l.id() == lesson.id()) {
                return Err(CatalogError::DuplicateLessonId(lesson.id().clone()));
            }
        }

        Ok(Self { lessons })
    }

    /// The lowest-level lesson: the curriculum entry point.
    #[must_use]
    pub fn first(&self) -> &Lesson {
        // the constructor rejects empty catalogs
        &self.lessons[0]
    }

    /// Looks a lesson up by id.
    #[must_use]
    pub fn get(&self, id: &LessonId) -> Option<&Lesson> {
        self.lessons.iter().find(|l| l.id() == id)
    }

    #[must_use]
    pub fn contains(&self, id: &LessonId) -> bool {
        self.get(id).is_some()
    }

    /// The lesson one level above the given one, if both exist.
    ///
    /// Returns `None` for an unknown id or when the given lesson is the
    /// last in the curriculum.
    #[must_use]
    pub fn successor_of(&self, id: &LessonId) -> Option<&Lesson> {
        let completed = self.get(id)?;
        let next_level = completed.level().checked_add(1)?;
        self.lessons.iter().find(|l| l.level() == next_level)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lessons.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lessons.is_empty()
    }

    /// Lessons in level order.
    pub fn iter(&self) -> impl Iterator<Item = &Lesson> {
        self.lessons.iter()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    fn lesson(id: &str, level: u32) -> Lesson {
        Lesson::new(LessonId::new(id), format!("Lesson {id}"), None, level).unwrap()
    }

    #[test]
    fn lesson_new_rejects_blank_title() {
        let err = Lesson::new(LessonId::new("a"), "   ", None, 1).unwrap_err();
        assert_eq!(err, LessonError::EmptyTitle);
    }

    #[test]
    fn lesson_new_rejects_zero_level() {
        let err = Lesson::new(LessonId::new("a"), "Greetings", None, 0).unwrap_err();
        assert_eq!(err, LessonError::InvalidLevel);
    }

    #[test]
    fn lesson_trims_title_and_description() {
        let lesson = Lesson::new(
            LessonId::new("a"),
            "  Greetings  ",
            Some("  hello and goodbye  ".into()),
            1,
        )
        .unwrap();
        assert_eq!(lesson.title(), "Greetings");
        assert_eq!(lesson.description(), Some("hello and goodbye"));
    }

    #[test]
    fn catalog_rejects_empty_list() {
        assert_eq!(Catalog::new(vec![]).unwrap_err(), CatalogError::Empty);
    }

    #[test]
    fn catalog_sorts_by_level() {
        let catalog = Catalog::new(vec![lesson("c", 3), lesson("a", 1), lesson("b", 2)]).unwrap();
        let levels: Vec<u32> = catalog.iter().map(Lesson::level).collect();
        assert_eq!(levels, vec![1, 2, 3]);
        assert_eq!(catalog.first().id(), &LessonId::new("a"));
    }

    #[test]
    fn catalog_rejects_duplicate_levels() {
        let err = Catalog::new(vec![lesson("a", 1), lesson("b", 1)]).unwrap_err();
        assert_eq!(err, CatalogError::DuplicateLevel(1));
    }

    #[test]
    fn catalog_rejects_duplicate_ids() {
        let err = Catalog::new(vec![lesson("a", 1), lesson("a", 2)]).unwrap_err();
        assert_eq!(err, CatalogError::DuplicateLessonId(LessonId::new("a")));
    }

    #[test]
    fn successor_walks_one_level_up() {
        let catalog = Catalog::new(vec![lesson("a", 1), lesson("b", 2), lesson("c", 3)]).unwrap();

        assert_eq!(
            catalog.successor_of(&LessonId::new("a")).map(Lesson::id),
            Some(&LessonId::new("b"))
        );
        assert_eq!(
            catalog.successor_of(&LessonId::new("b")).map(Lesson::id),
            Some(&LessonId::new("c"))
        );
        // last lesson has no successor
        assert_eq!(catalog.successor_of(&LessonId::new("c")), None);
        // unknown ids resolve to nothing
        assert_eq!(catalog.successor_of(&LessonId::new("zzz")), None);
    }

    #[test]
    fn successor_stops_at_level_gap() {
        let catalog = Catalog::new(vec![lesson("a", 1), lesson("c", 3)]).unwrap();
        assert_eq!(catalog.successor_of(&LessonId::new("a")), None);
    }
}
