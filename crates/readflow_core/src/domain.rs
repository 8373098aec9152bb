//! crates/readflow_core/src/domain.rs
//!
//! Defines the pure, core data structures for the application.
//! These structs double as the stored shape: every collection is mirrored
//! into a named store slot as plain JSON, so they all derive serde.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The singleton per-installation counters. Streaks are stored but never
/// auto-incremented or reset; `level` starts at 1 and is never advanced by
/// any code path (the read side projects `level * 1000` as the next
/// threshold).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStats {
    pub daily_streak: u32,
    pub weekly_streak: u32,
    pub monthly_streak: u32,
    pub yearly_streak: u32,
    pub total_time_read_minutes: u32,
    pub total_time_written_minutes: u32,
    pub total_pages_read: u32,
    /// Last measured or manually set reading speed; 0 means "never measured".
    pub current_wpm: u32,
    pub coins: u32,
    pub xp: u32,
    pub level: u32,
}

impl Default for UserStats {
    fn default() -> Self {
        Self {
            daily_streak: 0,
            weekly_streak: 0,
            monthly_streak: 0,
            yearly_streak: 0,
            total_time_read_minutes: 0,
            total_time_written_minutes: 0,
            total_pages_read: 0,
            current_wpm: 0,
            coins: 0,
            xp: 0,
            level: 1,
        }
    }
}

/// How a session was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SessionKind {
    SpeedTest,
    ManualLog,
    Writing,
}

/// One timed or manually logged reading/writing record. Immutable once
/// created; the session log is append-only.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadingSession {
    pub id: Uuid,
    pub date: DateTime<Utc>,
    pub duration_seconds: u32,
    /// 0 means "not measured" for this session.
    pub wpm: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pages: Option<u32>,
    #[serde(rename = "type")]
    pub kind: SessionKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub passage_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GoalUnit {
    Minutes,
    Pages,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GoalPeriod {
    Daily,
    Weekly,
    Monthly,
}

/// A user-defined recurring target. `current` accumulates progress in
/// `unit`; toggling `completed` never touches `current`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    pub id: Uuid,
    pub title: String,
    pub target: u32,
    pub current: u32,
    pub unit: GoalUnit,
    pub period: GoalPeriod,
    pub completed: bool,
    /// "HH:MM" (24h).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reminder_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
}

/// The stat threshold that unlocks a badge, as data rather than an
/// embedded predicate, so the badge list stays serializable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "kebab-case")]
pub enum BadgeCondition {
    StreakThreshold(u32),
    WpmThreshold(u32),
    PagesThreshold(u32),
}

impl BadgeCondition {
    pub fn is_met(&self, stats: &UserStats) -> bool {
        match *self {
            BadgeCondition::StreakThreshold(days) => stats.daily_streak >= days,
            BadgeCondition::WpmThreshold(wpm) => stats.current_wpm >= wpm,
            BadgeCondition::PagesThreshold(pages) => stats.total_pages_read >= pages,
        }
    }
}

/// An achievement. `unlocked` is monotonic: once true it must never be
/// cleared, even if the underlying stat later drops below the threshold.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Badge {
    pub id: String,
    pub name: String,
    pub description: String,
    /// References an icon name in whatever renders this.
    pub icon: String,
    pub unlocked: bool,
    pub color: String,
    pub condition: BadgeCondition,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityKind {
    Syllabus,
    Goal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivitySubtype {
    Completion,
    Creation,
    Progress,
}

/// One entry of the append-only activity feed (newest first). Only goal
/// and syllabus events are logged; session saves are not.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityItem {
    pub id: Uuid,
    pub date: DateTime<Utc>,
    #[serde(rename = "type")]
    pub kind: ActivityKind,
    pub subtype: ActivitySubtype,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
}

impl ActivityItem {
    pub fn new(
        kind: ActivityKind,
        subtype: ActivitySubtype,
        description: impl Into<String>,
        subject: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            date: Utc::now(),
            kind,
            subtype,
            description: description.into(),
            subject,
        }
    }
}

/// A curriculum chapter. The two flags encode a tri-state and are never
/// both true: not-started (both false), in-progress, completed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chapter {
    /// Seeded chapters carry short mnemonic ids ("dg1", "r3"); user-added
    /// chapters get uuid-derived ids.
    pub id: String,
    pub title: String,
    pub is_completed: bool,
    pub is_in_progress: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChapterStatus {
    NotStarted,
    InProgress,
    Completed,
}

impl Chapter {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            is_completed: false,
            is_in_progress: false,
        }
    }

    pub fn status(&self) -> ChapterStatus {
        if self.is_completed {
            ChapterStatus::Completed
        } else if self.is_in_progress {
            ChapterStatus::InProgress
        } else {
            ChapterStatus::NotStarted
        }
    }
}

/// A curriculum subject: a named, colored, ordered run of chapters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subject {
    pub name: String,
    pub color: String,
    pub chapters: Vec<Chapter>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

/// A generated speed-test passage.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadingPassage {
    pub title: String,
    pub content: String,
    pub word_count: u32,
    pub difficulty: Difficulty,
}

const FALLBACK_PASSAGE: &str = "Reading is a complex cognitive process of decoding symbols in order to construct or derive meaning. Reading is a means of language acquisition, communication, and of sharing information and ideas. Like all languages, it is a complex interaction between the text and the reader which is shaped by the reader's prior knowledge, experiences, attitude.";

impl ReadingPassage {
    /// The deterministic passage served whenever generation fails.
    pub fn fallback() -> Self {
        Self {
            title: "The Art of Reading (Fallback)".to_string(),
            content: FALLBACK_PASSAGE.to_string(),
            word_count: FALLBACK_PASSAGE.split_whitespace().count() as u32,
            difficulty: Difficulty::Medium,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightKind {
    Encouragement,
    Analysis,
    Tip,
}

/// One generated observation about recent reading habits.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadingInsight {
    pub message: String,
    #[serde(rename = "type")]
    pub kind: InsightKind,
}

impl ReadingInsight {
    /// Served for an empty session log, without consulting the generator.
    pub fn first_session_encouragement() -> Vec<Self> {
        vec![Self {
            message: "Complete your first reading session to unlock AI-powered insights!"
                .to_string(),
            kind: InsightKind::Encouragement,
        }]
    }

    /// Served whenever insight generation fails.
    pub fn fallback_tips() -> Vec<Self> {
        vec![
            Self {
                message: "Consistent practice is key to improving reading speed.".to_string(),
                kind: InsightKind::Tip,
            },
            Self {
                message: "Try to reduce subvocalization to read faster.".to_string(),
                kind: InsightKind::Tip,
            },
        ]
    }
}

/// Derived view of today's sessions: reading minutes, pages, average WPM.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodayStats {
    pub time: u32,
    pub pages: u32,
    pub wpm: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn badge_conditions_serialize_as_tagged_values() {
        let condition = BadgeCondition::StreakThreshold(7);
        assert_eq!(
            serde_json::to_value(condition).unwrap(),
            json!({ "kind": "streak-threshold", "value": 7 })
        );
        let parsed: BadgeCondition =
            serde_json::from_value(json!({ "kind": "wpm-threshold", "value": 300 })).unwrap();
        assert_eq!(parsed, BadgeCondition::WpmThreshold(300));
    }

    #[test]
    fn session_kind_uses_kebab_case_on_the_wire() {
        assert_eq!(
            serde_json::to_value(SessionKind::SpeedTest).unwrap(),
            json!("speed-test")
        );
        assert_eq!(
            serde_json::to_value(SessionKind::ManualLog).unwrap(),
            json!("manual-log")
        );
    }

    #[test]
    fn fallback_passage_word_count_matches_its_content() {
        let passage = ReadingPassage::fallback();
        assert_eq!(
            passage.word_count,
            passage.content.split_whitespace().count() as u32
        );
        assert_eq!(passage.difficulty, Difficulty::Medium);
    }

    #[test]
    fn fallback_insights_are_fixed_tips() {
        let tips = ReadingInsight::fallback_tips();
        assert_eq!(tips.len(), 2);
        assert!(tips.iter().all(|t| t.kind == InsightKind::Tip));

        let first = ReadingInsight::first_session_encouragement();
        assert_eq!(first.len(), 1);
        assert_eq!(first[0].kind, InsightKind::Encouragement);
    }
}
