use std::collections::{BTreeMap, BTreeSet};

use anyhow::Result;
use chrono::{DateTime, NaiveDate, Utc};

use super::store::{ProgressKey, ProgressStore, load_json, save_json};
use crate::errors::ProgressError;

/// Lesson id to completion time
pub type LessonLog = BTreeMap<String, DateTime<Utc>>;

/// Returns true when the lesson was not completed before
pub fn complete_lesson(
    store: &dyn ProgressStore,
    namespace: &str,
    lesson_id: &str,
    completed_at: DateTime<Utc>,
) -> Result<bool> {
    let mut lessons = completed_lessons(store, namespace)?;
    let newly_completed = insert_lesson(&mut lessons, lesson_id, completed_at)?;
    if newly_completed {
        save_json(store, namespace, ProgressKey::CompletedLessons, &lessons)?;
    }
    Ok(newly_completed)
}

/// In-memory counterpart of `complete_lesson`
pub fn insert_lesson(
    lessons: &mut LessonLog,
    lesson_id: &str,
    completed_at: DateTime<Utc>,
) -> Result<bool> {
    let lesson_id = normalize_lesson_id(lesson_id)?;
    if lessons.contains_key(&lesson_id) {
        return Ok(false);
    }
    lessons.insert(lesson_id, completed_at);
    Ok(true)
}

pub fn completed_lessons(store: &dyn ProgressStore, namespace: &str) -> Result<LessonLog> {
    load_json(store, namespace, ProgressKey::CompletedLessons)
}

pub fn is_completed(store: &dyn ProgressStore, namespace: &str, lesson_id: &str) -> Result<bool> {
    let lesson_id = normalize_lesson_id(lesson_id)?;
    Ok(completed_lessons(store, namespace)?.contains_key(&lesson_id))
}

/// Remember that the learner was already sent on from this lesson
pub fn mark_redirected(store: &dyn ProgressStore, namespace: &str, lesson_id: &str) -> Result<()> {
    let lesson_id = normalize_lesson_id(lesson_id)?;
    let mut redirected: BTreeSet<String> =
        load_json(store, namespace, ProgressKey::RedirectedLessons)?;
    if redirected.insert(lesson_id) {
        save_json(store, namespace, ProgressKey::RedirectedLessons, &redirected)?;
    }
    Ok(())
}

pub fn was_redirected(store: &dyn ProgressStore, namespace: &str, lesson_id: &str) -> Result<bool> {
    let lesson_id = normalize_lesson_id(lesson_id)?;
    let redirected: BTreeSet<String> = load_json(store, namespace, ProgressKey::RedirectedLessons)?;
    Ok(redirected.contains(&lesson_id))
}

pub fn activity_dates(lessons: &LessonLog) -> impl Iterator<Item = NaiveDate> + '_ {
    lessons.values().map(|completed_at| completed_at.date_naive())
}

fn normalize_lesson_id(lesson_id: &str) -> Result<String> {
    let trimmed = lesson_id.trim();
    if trimmed.is_empty() {
        return Err(ProgressError::EmptyLessonId.into());
    }
    Ok(trimmed.to_string())
}
