//! The quiz system: owns every quiz and student and keeps them on disk.
//!
//! Each mutating call saves the full state before it returns.

use std::collections::BTreeMap;

use chrono::Utc;

use crate::attempt::AttemptIo;
use crate::error::{QuizError, Result};
use crate::model::{Quiz, ScoreRecord, Student};
use crate::report::SystemReport;
use crate::storage::{JsonStore, Loaded};

/// Id given to the first student of an empty system.
pub const DEFAULT_FIRST_STUDENT_ID: u64 = 1001;

/// Hands out student ids. Never goes backwards, never goes below its origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StudentIds {
    origin: u64,
    next: u64,
}

impl StudentIds {
    pub fn new(origin: u64) -> Self {
        Self {
            origin,
            next: origin,
        }
    }

    /// The id the next call to [`allocate`](Self::allocate) will return.
    pub fn peek(&self) -> u64 {
        self.next
    }

    /// Hand out the next id. `u64::MAX` is never handed out, so the counter
    /// always has somewhere to go.
    pub fn allocate(&mut self) -> Result<u64> {
        let id = self.next;
        self.next = id.checked_add(1).ok_or(QuizError::IdsExhausted(id))?;
        Ok(id)
    }

    /// Move the counter past every id in `existing`.
    ///
    /// Fails without touching the counter if the largest id has no successor.
    pub fn reconcile(&mut self, existing: impl IntoIterator<Item = u64>) -> Result<()> {
        let after_max = match existing.into_iter().max() {
            Some(max) => max.checked_add(1).ok_or(QuizError::IdsExhausted(max))?,
            None => self.origin,
        };
        self.next = self.next.max(after_max).max(self.origin);
        Ok(())
    }
}

/// What a finished attempt produced.
#[derive(Debug, Clone, PartialEq)]
pub struct AttemptOutcome {
    pub student_id: u64,
    pub student_name: String,
    pub quiz_title: String,
    pub record: ScoreRecord,
}

impl AttemptOutcome {
    pub fn percentage(&self) -> Option<f64> {
        self.record.percentage()
    }
}

/// All quizzes and students, plus the store they are persisted to.
#[derive(Debug)]
pub struct QuizSystem {
    quizzes: BTreeMap<String, Quiz>,
    students: BTreeMap<u64, Student>,
    ids: StudentIds,
    store: JsonStore,
}

impl QuizSystem {
    /// An empty system that has not touched the store yet.
    pub fn new(store: JsonStore, first_student_id: u64) -> Self {
        Self {
            quizzes: BTreeMap::new(),
            students: BTreeMap::new(),
            ids: StudentIds::new(first_student_id),
            store,
        }
    }

    /// Load both collections from `store`.
    ///
    /// This cannot fail: missing or unusable files give empty collections
    /// (see [`JsonStore`]). The id counter is moved past the largest loaded id;
    /// a students file holding an id with no successor counts as unusable.
    pub fn load(store: JsonStore, first_student_id: u64) -> Self {
        let mut system = Self::new(store, first_student_id);

        let mut students = system.store.load_students();
        let overflow = match &students {
            Loaded::Items(items) => system.ids.reconcile(items.iter().map(Student::id)).err(),
            _ => None,
        };
        if let Some(error) = overflow {
            students = system.store.set_aside_students(error);
        }
        let malformed_students = matches!(students, Loaded::Malformed { .. });
        for student in students.into_items() {
            if let Some(previous) = system.students.insert(student.id(), student) {
                tracing::warn!(
                    "duplicate student id {} in store, keeping the later record",
                    previous.id()
                );
            }
        }

        let quizzes = system.store.load_quizzes();
        let malformed_quizzes = matches!(quizzes, Loaded::Malformed { .. });
        for quiz in quizzes.into_items() {
            system.quizzes.insert(quiz.title().to_string(), quiz);
        }

        tracing::info!(
            students = system.students.len(),
            quizzes = system.quizzes.len(),
            next_student_id = system.ids.peek(),
            malformed_students,
            malformed_quizzes,
            "loaded data from {}",
            system.store.dir().display()
        );
        system
    }

    /// Write both collections to the store.
    pub fn save(&self) -> Result<()> {
        self.store.save_students(self.students.values())?;
        self.store.save_quizzes(self.quizzes.values())?;
        Ok(())
    }

    /// The id the next registered student will get.
    pub fn next_student_id(&self) -> u64 {
        self.ids.peek()
    }

    /// Register a student under a fresh id and save.
    ///
    /// If the save fails the student is dropped again. The id stays used.
    pub fn create_student(&mut self, name: impl Into<String>) -> Result<&Student> {
        let id = self.ids.allocate()?;
        self.students.insert(id, Student::new(id, name));
        if let Err(e) = self.save() {
            self.students.remove(&id);
            return Err(e);
        }
        let student = self.student(id)?;
        tracing::info!("student created: {} with ID {}", student.name(), id);
        Ok(student)
    }

    /// Store a quiz under its title and save.
    ///
    /// A quiz with the same title is replaced and returned.
    pub fn add_quiz(&mut self, quiz: Quiz) -> Result<Option<Quiz>> {
        let title = quiz.title().to_string();
        let replaced = self.quizzes.insert(title.clone(), quiz);
        if replaced.is_some() {
            tracing::warn!("quiz '{title}' replaced an existing quiz with the same title");
        } else {
            tracing::info!("quiz '{title}' added");
        }
        self.save()?;
        Ok(replaced)
    }

    pub fn student(&self, id: u64) -> Result<&Student> {
        self.students.get(&id).ok_or(QuizError::StudentNotFound(id))
    }

    pub fn quiz(&self, title: &str) -> Result<&Quiz> {
        self.quizzes
            .get(title)
            .ok_or_else(|| QuizError::QuizNotFound(title.to_string()))
    }

    /// Students in id order.
    pub fn students(&self) -> impl Iterator<Item = &Student> {
        self.students.values()
    }

    /// Quizzes in title order.
    pub fn quizzes(&self) -> impl Iterator<Item = &Quiz> {
        self.quizzes.values()
    }

    pub fn quiz_titles(&self) -> impl Iterator<Item = &str> {
        self.quizzes.keys().map(String::as_str)
    }

    pub fn has_students(&self) -> bool {
        !self.students.is_empty()
    }

    pub fn has_quizzes(&self) -> bool {
        !self.quizzes.is_empty()
    }

    /// Run one attempt, record it on the student, and save.
    ///
    /// Unknown ids or titles fail before anything is asked or changed. An
    /// aborted attempt records nothing.
    pub fn attempt_quiz(
        &mut self,
        student_id: u64,
        quiz_title: &str,
        io: &mut dyn AttemptIo,
    ) -> Result<AttemptOutcome> {
        if !self.students.contains_key(&student_id) {
            return Err(QuizError::StudentNotFound(student_id));
        }
        let quiz = self
            .quizzes
            .get(quiz_title)
            .ok_or_else(|| QuizError::QuizNotFound(quiz_title.to_string()))?;

        let record = quiz.attempt(io)?;

        let student = self
            .students
            .get_mut(&student_id)
            .ok_or(QuizError::StudentNotFound(student_id))?;
        student.record_score(quiz_title, record.score, record.total)?;
        let outcome = AttemptOutcome {
            student_id,
            student_name: student.name().to_string(),
            quiz_title: quiz_title.to_string(),
            record,
        };

        tracing::info!(
            student_id,
            quiz = quiz_title,
            score = record.score,
            total = record.total,
            "attempt recorded"
        );
        self.save()?;
        Ok(outcome)
    }

    /// Summaries of every student, in id order.
    pub fn report(&self) -> SystemReport {
        SystemReport {
            created_at: Utc::now(),
            quiz_count: self.quizzes.len(),
            students: self.students.values().map(Student::summary).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attempt::ScriptedIo;
    use crate::model::Question;

    fn basic_python() -> Quiz {
        let q = |text: &str, opts: &[&str], correct| {
            Question::new(text, opts.iter().map(|s| s.to_string()).collect(), correct).unwrap()
        };
        Quiz::new("Basic Python")
            .with_question(q("Known for?", &["Web", "Data", "Consoles"], 1))
            .with_question(q("Function keyword?", &["def", "func", "function"], 0))
            .with_question(q("Ordered and mutable?", &["tuple", "list", "set"], 1))
    }

    fn fresh() -> (tempfile::TempDir, QuizSystem) {
        let dir = tempfile::tempdir().unwrap();
        let system = QuizSystem::load(JsonStore::new(dir.path()), DEFAULT_FIRST_STUDENT_ID);
        (dir, system)
    }

    #[test]
    fn ids_reconcile_past_max() {
        let mut ids = StudentIds::new(1001);
        ids.reconcile([1003, 1050, 1010]).unwrap();
        assert_eq!(ids.allocate().unwrap(), 1051);
        assert_eq!(ids.allocate().unwrap(), 1052);
    }

    #[test]
    fn ids_never_drop_below_origin() {
        let mut ids = StudentIds::new(1001);
        ids.reconcile([3, 7]).unwrap();
        assert_eq!(ids.peek(), 1001);
        ids.reconcile(std::iter::empty()).unwrap();
        assert_eq!(ids.peek(), 1001);
    }

    #[test]
    fn ids_stop_at_the_top_of_the_range() {
        let mut ids = StudentIds::new(1001);
        let err = ids.reconcile([1002, u64::MAX]).unwrap_err();
        assert!(matches!(err, QuizError::IdsExhausted(u64::MAX)));
        assert_eq!(ids.peek(), 1001);

        let mut ids = StudentIds::new(u64::MAX - 1);
        assert_eq!(ids.allocate().unwrap(), u64::MAX - 1);
        assert!(matches!(ids.allocate(), Err(QuizError::IdsExhausted(u64::MAX))));
        assert!(matches!(ids.allocate(), Err(QuizError::IdsExhausted(u64::MAX))));
    }

    #[test]
    fn stored_max_id_sets_the_students_file_aside() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::new(dir.path());
        std::fs::write(
            store.students_path(),
            r#"[{"id": 18446744073709551615, "name": "Max", "scores": {}}]"#,
        )
        .unwrap();

        let mut system = QuizSystem::load(store, DEFAULT_FIRST_STUDENT_ID);
        assert!(!system.has_students());
        assert_eq!(system.next_student_id(), DEFAULT_FIRST_STUDENT_ID);

        let backups = std::fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().starts_with("students.json.corrupt-"))
            .count();
        assert_eq!(backups, 1);

        let id = system.create_student("Alice").unwrap().id();
        assert_eq!(id, DEFAULT_FIRST_STUDENT_ID);
    }

    #[test]
    fn exhausted_origin_refuses_new_students() {
        let dir = tempfile::tempdir().unwrap();
        let mut system = QuizSystem::load(JsonStore::new(dir.path()), u64::MAX);
        let err = system.create_student("Alice").unwrap_err();
        assert!(matches!(err, QuizError::IdsExhausted(u64::MAX)));
        assert!(!system.has_students());
        assert!(!dir.path().join("students.json").exists());
    }

    #[test]
    fn failed_save_drops_the_new_student() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        std::fs::write(&blocker, "").unwrap();
        let mut system = QuizSystem::new(JsonStore::new(&blocker), DEFAULT_FIRST_STUDENT_ID);

        let err = system.create_student("Zed").unwrap_err();
        assert!(matches!(err, QuizError::Storage { .. }));
        assert!(!system.has_students());
        assert!(system.report().students.is_empty());
        assert_eq!(system.next_student_id(), DEFAULT_FIRST_STUDENT_ID + 1);
    }

    #[test]
    fn created_ids_are_strictly_increasing() {
        let (_dir, mut system) = fresh();
        let ids: Vec<u64> = (0..10)
            .map(|i| system.create_student(format!("s{i}")).unwrap().id())
            .collect();
        assert!(ids.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(ids[0], DEFAULT_FIRST_STUDENT_ID);
    }

    #[test]
    fn duplicate_names_are_allowed() {
        let (_dir, mut system) = fresh();
        let a = system.create_student("Sam").unwrap().id();
        let b = system.create_student("Sam").unwrap().id();
        assert_ne!(a, b);
    }

    #[test]
    fn reload_restores_counter_from_max_id() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::new(dir.path());
        store
            .save_students([&Student::new(1050, "Old"), &Student::new(1002, "Older")])
            .unwrap();

        let mut system = QuizSystem::load(store, DEFAULT_FIRST_STUDENT_ID);
        let id = system.create_student("New").unwrap().id();
        assert!(id >= 1051);
    }

    #[test]
    fn attempt_records_and_persists() {
        let (dir, mut system) = fresh();
        system.add_quiz(basic_python()).unwrap();
        let id = system.create_student("Alice").unwrap().id();

        let mut io = ScriptedIo::new(["2", "1", "3"]);
        let outcome = system.attempt_quiz(id, "Basic Python", &mut io).unwrap();
        assert_eq!(outcome.record, ScoreRecord { score: 2, total: 3 });
        assert_eq!(outcome.student_name, "Alice");

        let summary = system.student(id).unwrap().summary();
        assert_eq!(summary.total_attempted, 1);
        assert_eq!(summary.details["Basic Python"], ScoreRecord { score: 2, total: 3 });

        let reloaded = QuizSystem::load(JsonStore::new(dir.path()), DEFAULT_FIRST_STUDENT_ID);
        assert_eq!(
            reloaded.student(id).unwrap().score_for("Basic Python"),
            Some(ScoreRecord { score: 2, total: 3 })
        );
    }

    #[test]
    fn reattempt_overwrites() {
        let (_dir, mut system) = fresh();
        system.add_quiz(basic_python()).unwrap();
        let id = system.create_student("Alice").unwrap().id();

        system
            .attempt_quiz(id, "Basic Python", &mut ScriptedIo::new(["1", "2", "3"]))
            .unwrap();
        system
            .attempt_quiz(id, "Basic Python", &mut ScriptedIo::new(["2", "1", "2"]))
            .unwrap();

        let student = system.student(id).unwrap();
        assert_eq!(student.scores().len(), 1);
        assert_eq!(
            student.score_for("Basic Python"),
            Some(ScoreRecord { score: 3, total: 3 })
        );
    }

    #[test]
    fn unknown_quiz_or_student_changes_nothing() {
        let (_dir, mut system) = fresh();
        system.add_quiz(basic_python()).unwrap();
        let id = system.create_student("Alice").unwrap().id();
        let before_students: Vec<Student> = system.students().cloned().collect();
        let before_quizzes: Vec<Quiz> = system.quizzes().cloned().collect();

        let mut io = ScriptedIo::new(["1", "1", "1"]);
        let err = system.attempt_quiz(id, "Nope", &mut io).unwrap_err();
        assert!(matches!(err, QuizError::QuizNotFound(ref t) if t == "Nope"));

        let err = system.attempt_quiz(9999, "Basic Python", &mut io).unwrap_err();
        assert!(matches!(err, QuizError::StudentNotFound(9999)));

        assert!(io.shown.is_empty());
        assert_eq!(system.students().cloned().collect::<Vec<_>>(), before_students);
        assert_eq!(system.quizzes().cloned().collect::<Vec<_>>(), before_quizzes);
    }

    #[test]
    fn aborted_attempt_records_nothing() {
        let (_dir, mut system) = fresh();
        system.add_quiz(basic_python()).unwrap();
        let id = system.create_student("Alice").unwrap().id();

        let err = system
            .attempt_quiz(id, "Basic Python", &mut ScriptedIo::new(["2"]))
            .unwrap_err();
        assert!(matches!(err, QuizError::AttemptAborted));
        assert!(system.student(id).unwrap().scores().is_empty());
    }

    #[test]
    fn empty_quiz_attempt_yields_zero_of_zero() {
        let (_dir, mut system) = fresh();
        system.add_quiz(Quiz::new("Empty")).unwrap();
        let id = system.create_student("Alice").unwrap().id();

        let outcome = system
            .attempt_quiz(id, "Empty", &mut ScriptedIo::new(Vec::<String>::new()))
            .unwrap();
        assert_eq!(outcome.record, ScoreRecord { score: 0, total: 0 });
        assert_eq!(outcome.percentage(), None);
    }

    #[test]
    fn add_quiz_overwrites_same_title() {
        let (_dir, mut system) = fresh();
        assert!(system.add_quiz(basic_python()).unwrap().is_none());
        let replaced = system.add_quiz(Quiz::new("Basic Python")).unwrap();
        assert_eq!(replaced.map(|q| q.len()), Some(3));
        assert_eq!(system.quiz("Basic Python").unwrap().len(), 0);
        assert_eq!(system.quiz_titles().count(), 1);
    }

    #[test]
    fn full_state_roundtrip() {
        let (dir, mut system) = fresh();
        system.add_quiz(basic_python()).unwrap();
        system.add_quiz(Quiz::new("Empty")).unwrap();
        let a = system.create_student("Alice").unwrap().id();
        system.create_student("Bob").unwrap();
        system
            .attempt_quiz(a, "Basic Python", &mut ScriptedIo::new(["2", "1", "2"]))
            .unwrap();

        let reloaded = QuizSystem::load(JsonStore::new(dir.path()), DEFAULT_FIRST_STUDENT_ID);
        assert_eq!(
            reloaded.students().collect::<Vec<_>>(),
            system.students().collect::<Vec<_>>()
        );
        assert_eq!(
            reloaded.quizzes().collect::<Vec<_>>(),
            system.quizzes().collect::<Vec<_>>()
        );
        assert_eq!(reloaded.next_student_id(), system.next_student_id());
    }

    #[test]
    fn corrupt_store_loads_empty_and_stays_usable() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::new(dir.path());
        std::fs::write(store.students_path(), "[{\"id\": ").unwrap();
        std::fs::write(store.quizzes_path(), "not json at all").unwrap();

        let mut system = QuizSystem::load(store, DEFAULT_FIRST_STUDENT_ID);
        assert!(!system.has_students());
        assert!(!system.has_quizzes());

        let id = system.create_student("Alice").unwrap().id();
        assert_eq!(id, DEFAULT_FIRST_STUDENT_ID);
    }

    #[test]
    fn report_lists_students_in_id_order() {
        let (_dir, mut system) = fresh();
        system.create_student("Alice").unwrap();
        system.create_student("Bob").unwrap();
        let report = system.report();
        let names: Vec<_> = report.students.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Alice", "Bob"]);
        assert!(report.students.iter().all(|s| s.total_attempted == 0));
    }
}
