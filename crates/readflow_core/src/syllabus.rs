//! crates/readflow_core/src/syllabus.rs
//!
//! The curriculum tracker: per-chapter tri-state progress, aggregate
//! percentages, and the day-of-week study schedule. The whole state is
//! persisted as one document in the syllabus store slot.

use crate::domain::{Chapter, ChapterStatus, Subject};
use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Chapters-per-subject target shown by the weekly bars. Counts all-time
/// completions, not a calendar window.
pub const WEEKLY_CHAPTER_TARGET: u32 = 3;

/// A chapter transition worth surfacing in the activity feed. The
/// completed → not-started leg of the cycle is silent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChapterEvent {
    Started { title: String, subject: String },
    Completed { title: String, subject: String },
}

/// What the schedule card should show today.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScheduleKind {
    Study,
    Manual,
    Revision,
    Buffer,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleRecommendation {
    #[serde(rename = "type")]
    pub kind: ScheduleKind,
    pub title: String,
    pub subtitle: String,
    pub color: String,
}

/// The persisted syllabus document: the subject tree plus the two schedule
/// flags. The derived recommendation itself is never stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyllabusState {
    pub subjects: Vec<Subject>,
    #[serde(default)]
    pub buffer_day: bool,
    #[serde(default)]
    pub manual_subject_index: Option<usize>,
}

impl SyllabusState {
    pub fn new(subjects: Vec<Subject>) -> Self {
        Self {
            subjects,
            buffer_day: false,
            manual_subject_index: None,
        }
    }

    /// Advances a chapter one step around the cycle
    /// not-started → in-progress → completed → not-started.
    /// Unknown subject or chapter ids are a no-op.
    pub fn toggle_chapter(&mut self, subject_index: usize, chapter_id: &str) -> Option<ChapterEvent> {
        let subject = self.subjects.get_mut(subject_index)?;
        let subject_name = subject.name.clone();
        let chapter = subject.chapters.iter_mut().find(|c| c.id == chapter_id)?;

        match chapter.status() {
            ChapterStatus::NotStarted => {
                chapter.is_in_progress = true;
                Some(ChapterEvent::Started {
                    title: chapter.title.clone(),
                    subject: subject_name,
                })
            }
            ChapterStatus::InProgress => {
                chapter.is_in_progress = false;
                chapter.is_completed = true;
                Some(ChapterEvent::Completed {
                    title: chapter.title.clone(),
                    subject: subject_name,
                })
            }
            ChapterStatus::Completed => {
                chapter.is_completed = false;
                chapter.is_in_progress = false;
                None
            }
        }
    }

    /// Appends a not-started chapter with a generated id and returns it.
    pub fn add_chapter(&mut self, subject_index: usize, title: &str) -> Option<&Chapter> {
        let title = title.trim();
        if title.is_empty() {
            return None;
        }
        let subject = self.subjects.get_mut(subject_index)?;
        let id = format!("custom_{}", Uuid::new_v4().simple());
        subject.chapters.push(Chapter::new(id, title));
        subject.chapters.last()
    }

    /// Removes a chapter by id; returns whether anything was removed.
    pub fn delete_chapter(&mut self, subject_index: usize, chapter_id: &str) -> bool {
        match self.subjects.get_mut(subject_index) {
            Some(subject) => {
                let before = subject.chapters.len();
                subject.chapters.retain(|c| c.id != chapter_id);
                subject.chapters.len() != before
            }
            None => false,
        }
    }

    /// Clears progress on every chapter of every subject. Irreversible;
    /// confirmation is the caller's problem.
    pub fn reset(&mut self) {
        for subject in &mut self.subjects {
            for chapter in &mut subject.chapters {
                chapter.is_completed = false;
                chapter.is_in_progress = false;
            }
        }
    }

    fn completed_in(subject: &Subject) -> u32 {
        subject.chapters.iter().filter(|c| c.is_completed).count() as u32
    }

    fn percent(completed: u32, total: u32) -> u8 {
        if total == 0 {
            0
        } else {
            (100.0 * completed as f64 / total as f64).round() as u8
        }
    }

    /// Completed chapters over all chapters, as a rounded percentage.
    pub fn overall_progress(&self) -> u8 {
        let total: u32 = self.subjects.iter().map(|s| s.chapters.len() as u32).sum();
        let completed: u32 = self.subjects.iter().map(Self::completed_in).sum();
        Self::percent(completed, total)
    }

    /// The same percentage scoped to one subject.
    pub fn subject_progress(&self, subject_index: usize) -> u8 {
        match self.subjects.get(subject_index) {
            Some(subject) => Self::percent(Self::completed_in(subject), subject.chapters.len() as u32),
            None => 0,
        }
    }

    /// All-time completions for one subject against the fixed weekly
    /// target, capped at 100.
    pub fn weekly_target_progress(&self, subject_index: usize) -> u8 {
        match self.subjects.get(subject_index) {
            Some(subject) => {
                let pct =
                    (100.0 * Self::completed_in(subject) as f64 / WEEKLY_CHAPTER_TARGET as f64)
                        .round() as u32;
                pct.min(100) as u8
            }
            None => 0,
        }
    }

    fn focus_subtitle(subject: &Subject) -> String {
        let target = subject
            .chapters
            .iter()
            .find(|c| !c.is_completed)
            .or_else(|| subject.chapters.first());
        match target {
            Some(chapter) => format!("Focus: {}", chapter.title),
            None => "Focus: All Complete!".to_string(),
        }
    }

    /// Picks what to study today. Priority: manual override, buffer day,
    /// weekend revision, then the weekday rotation (Monday = subject 0).
    pub fn today_schedule(&self, today: NaiveDate) -> ScheduleRecommendation {
        if let Some(index) = self.manual_subject_index {
            if let Some(subject) = self.subjects.get(index) {
                return ScheduleRecommendation {
                    kind: ScheduleKind::Manual,
                    title: subject.name.clone(),
                    subtitle: Self::focus_subtitle(subject),
                    color: subject.color.clone(),
                };
            }
        }

        if self.buffer_day {
            return ScheduleRecommendation {
                kind: ScheduleKind::Buffer,
                title: "Rest & Recharge".to_string(),
                subtitle: "Take a break to consolidate memory.".to_string(),
                color: "slate".to_string(),
            };
        }

        let weekday = today.weekday();
        if weekday == Weekday::Sat || weekday == Weekday::Sun {
            return ScheduleRecommendation {
                kind: ScheduleKind::Revision,
                title: "Weekly Revision".to_string(),
                subtitle: "Review all \"In Progress\" topics".to_string(),
                color: "indigo".to_string(),
            };
        }

        let index = weekday.num_days_from_monday() as usize % self.subjects.len().max(1);
        match self.subjects.get(index) {
            Some(subject) => ScheduleRecommendation {
                kind: ScheduleKind::Study,
                title: subject.name.clone(),
                subtitle: Self::focus_subtitle(subject),
                color: subject.color.clone(),
            },
            None => ScheduleRecommendation {
                kind: ScheduleKind::Revision,
                title: "Weekly Revision".to_string(),
                subtitle: "Review all \"In Progress\" topics".to_string(),
                color: "indigo".to_string(),
            },
        }
    }

    /// Advances the schedule override: buffer → subject 0, auto → subject 0,
    /// subject i → i + 1, last subject → back to auto.
    pub fn cycle_schedule(&mut self) {
        if self.buffer_day {
            self.buffer_day = false;
            self.manual_subject_index = Some(0);
            return;
        }

        self.manual_subject_index = match self.manual_subject_index {
            None => Some(0),
            Some(i) => {
                let next = i + 1;
                if next >= self.subjects.len() {
                    None
                } else {
                    Some(next)
                }
            }
        };
    }

    /// Turns buffer mode on or off; either way the manual override is
    /// dropped back to auto.
    pub fn set_buffer_day(&mut self, enabled: bool) {
        self.buffer_day = enabled;
        self.manual_subject_index = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defaults::default_syllabus;

    fn two_subject_state() -> SyllabusState {
        SyllabusState::new(vec![
            Subject {
                name: "Alpha".to_string(),
                color: "emerald".to_string(),
                chapters: vec![Chapter::new("a1", "One"), Chapter::new("a2", "Two")],
            },
            Subject {
                name: "Beta".to_string(),
                color: "blue".to_string(),
                chapters: vec![Chapter::new("b1", "Uno")],
            },
        ])
    }

    #[test]
    fn chapter_cycles_through_three_states() {
        let mut state = two_subject_state();

        let first = state.toggle_chapter(0, "a1");
        assert_eq!(
            first,
            Some(ChapterEvent::Started {
                title: "One".to_string(),
                subject: "Alpha".to_string()
            })
        );
        assert_eq!(state.subjects[0].chapters[0].status(), ChapterStatus::InProgress);

        let second = state.toggle_chapter(0, "a1");
        assert_eq!(
            second,
            Some(ChapterEvent::Completed {
                title: "One".to_string(),
                subject: "Alpha".to_string()
            })
        );
        assert_eq!(state.subjects[0].chapters[0].status(), ChapterStatus::Completed);

        // Third leg is silent and lands back at not-started.
        assert_eq!(state.toggle_chapter(0, "a1"), None);
        assert_eq!(state.subjects[0].chapters[0].status(), ChapterStatus::NotStarted);

        // Fourth toggle starts the cycle over.
        assert!(matches!(
            state.toggle_chapter(0, "a1"),
            Some(ChapterEvent::Started { .. })
        ));
    }

    #[test]
    fn toggling_unknown_ids_is_a_no_op() {
        let mut state = two_subject_state();
        assert_eq!(state.toggle_chapter(9, "a1"), None);
        assert_eq!(state.toggle_chapter(0, "missing"), None);
        assert_eq!(state.subjects[0].chapters[0].status(), ChapterStatus::NotStarted);
    }

    #[test]
    fn progress_percentages() {
        let mut state = two_subject_state();
        assert_eq!(state.overall_progress(), 0);

        state.toggle_chapter(0, "a1");
        state.toggle_chapter(0, "a1");
        // 1 of 3 chapters complete.
        assert_eq!(state.overall_progress(), 33);
        assert_eq!(state.subject_progress(0), 50);
        assert_eq!(state.subject_progress(1), 0);
        // 1 of the fixed target of 3.
        assert_eq!(state.weekly_target_progress(0), 33);
    }

    #[test]
    fn weekly_target_progress_caps_at_100() {
        let mut state = SyllabusState::new(vec![Subject {
            name: "Alpha".to_string(),
            color: "emerald".to_string(),
            chapters: (0..5).map(|i| Chapter::new(format!("c{i}"), "Ch")).collect(),
        }]);
        for i in 0..5 {
            let id = format!("c{i}");
            state.toggle_chapter(0, &id);
            state.toggle_chapter(0, &id);
        }
        assert_eq!(state.weekly_target_progress(0), 100);
    }

    #[test]
    fn empty_syllabus_progress_is_zero() {
        let state = SyllabusState::new(Vec::new());
        assert_eq!(state.overall_progress(), 0);
    }

    #[test]
    fn reset_clears_every_chapter() {
        let mut state = default_syllabus();
        state.toggle_chapter(1, "r1");
        state.toggle_chapter(1, "r1");
        state.reset();
        assert_eq!(state.overall_progress(), 0);
        assert!(state
            .subjects
            .iter()
            .flat_map(|s| &s.chapters)
            .all(|c| c.status() == ChapterStatus::NotStarted));
    }

    #[test]
    fn add_and_delete_chapter() {
        let mut state = two_subject_state();
        let id = state.add_chapter(1, "  New Topic ").unwrap().id.clone();
        assert!(id.starts_with("custom_"));
        assert_eq!(state.subjects[1].chapters.last().unwrap().title, "New Topic");

        assert!(state.delete_chapter(1, &id));
        assert!(!state.delete_chapter(1, &id));
        assert!(state.add_chapter(0, "   ").is_none());
    }

    #[test]
    fn weekday_rotation_starts_monday_at_subject_zero() {
        let state = two_subject_state();
        // 2024-03-04 is a Monday.
        let monday = NaiveDate::from_ymd_opt(2024, 3, 4).unwrap();
        let schedule = state.today_schedule(monday);
        assert_eq!(schedule.kind, ScheduleKind::Study);
        assert_eq!(schedule.title, "Alpha");
        assert_eq!(schedule.subtitle, "Focus: One");

        // Tuesday wraps onto the second subject, Wednesday back to the first.
        let tuesday = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        assert_eq!(state.today_schedule(tuesday).title, "Beta");
        let wednesday = NaiveDate::from_ymd_opt(2024, 3, 6).unwrap();
        assert_eq!(state.today_schedule(wednesday).title, "Alpha");
    }

    #[test]
    fn weekends_recommend_revision() {
        let state = two_subject_state();
        let saturday = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        assert_eq!(state.today_schedule(saturday).kind, ScheduleKind::Revision);
        let sunday = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
        assert_eq!(state.today_schedule(sunday).kind, ScheduleKind::Revision);
    }

    #[test]
    fn override_and_buffer_take_priority() {
        let mut state = two_subject_state();
        let saturday = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();

        state.set_buffer_day(true);
        assert_eq!(state.today_schedule(saturday).kind, ScheduleKind::Buffer);

        // Cycling off buffer lands on the first subject as a manual pick,
        // which outranks both buffer and the weekend rule.
        state.cycle_schedule();
        let schedule = state.today_schedule(saturday);
        assert_eq!(schedule.kind, ScheduleKind::Manual);
        assert_eq!(schedule.title, "Alpha");
    }

    #[test]
    fn cycling_walks_subjects_then_returns_to_auto() {
        let mut state = two_subject_state();
        assert_eq!(state.manual_subject_index, None);
        state.cycle_schedule();
        assert_eq!(state.manual_subject_index, Some(0));
        state.cycle_schedule();
        assert_eq!(state.manual_subject_index, Some(1));
        state.cycle_schedule();
        assert_eq!(state.manual_subject_index, None);
    }

    #[test]
    fn manual_focus_skips_completed_chapters() {
        let mut state = two_subject_state();
        state.toggle_chapter(0, "a1");
        state.toggle_chapter(0, "a1");
        state.manual_subject_index = Some(0);
        let schedule = state.today_schedule(NaiveDate::from_ymd_opt(2024, 3, 9).unwrap());
        assert_eq!(schedule.subtitle, "Focus: Two");
    }

    #[test]
    fn default_seed_shape() {
        let state = default_syllabus();
        assert_eq!(state.subjects.len(), 6);
        let names: Vec<&str> = state.subjects.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(
            names,
            ["Dravyaguna", "Rasashastra", "Swasthavritta", "Roganidana", "Samhita", "Agadatantra"]
        );
        assert_eq!(state.subjects[0].chapters.len(), 118);
        // The seed ships with one Roganidana chapter already in progress.
        assert_eq!(
            state.subjects[3].chapters[0].status(),
            ChapterStatus::InProgress
        );
    }
}
