//! crates/readflow_core/src/tracker.rs
//!
//! The application-state controller. One `Tracker` owns every collection,
//! applies each mutation synchronously, mirrors the touched slots to the
//! persistent store, and re-runs badge unlocking whenever the stat counters
//! change. Store failures are logged and swallowed; no mutation is fatal.

use crate::defaults;
use crate::domain::{
    ActivityItem, ActivityKind, ActivitySubtype, Badge, Chapter, Goal, GoalUnit, ReadingSession,
    SessionKind, TodayStats, UserStats,
};
use crate::ports::{StateStore, StoreSlot};
use crate::stats;
use crate::syllabus::{ChapterEvent, ScheduleRecommendation, SyllabusState};
use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::warn;
use uuid::Uuid;

/// Vibration strength for the feedback signal a mutation surfaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Haptic {
    Light,
    Medium,
    Heavy,
}

/// The confirmation signal returned by mutations; rendering it (vibration,
/// celebration overlay) is the caller's concern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Feedback {
    pub haptic: Haptic,
    pub celebrate: bool,
}

impl Feedback {
    fn light() -> Self {
        Self { haptic: Haptic::Light, celebrate: false }
    }
    fn medium() -> Self {
        Self { haptic: Haptic::Medium, celebrate: false }
    }
    fn heavy() -> Self {
        Self { haptic: Haptic::Heavy, celebrate: false }
    }
    fn celebration() -> Self {
        Self { haptic: Haptic::Heavy, celebrate: true }
    }
}

/// What an active timer was measuring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerMode {
    Reading,
    Writing,
}

/// The single owner of all tracker state. Mutation methods apply the
/// transition, then await the store write for the touched slots before
/// returning, which keeps derived reads consistent within one event.
pub struct Tracker {
    store: Arc<dyn StateStore>,
    stats: UserStats,
    goals: Vec<Goal>,
    sessions: Vec<ReadingSession>,
    activities: Vec<ActivityItem>,
    syllabus: SyllabusState,
    badges: Vec<Badge>,
}

impl Tracker {
    /// Loads every slot from the store, substituting the built-in defaults
    /// for anything absent or unreadable. Never fails: a broken store just
    /// means a fresh tracker.
    pub async fn load(store: Arc<dyn StateStore>) -> Self {
        let stats: UserStats = read_slot(store.as_ref(), StoreSlot::Stats)
            .await
            .unwrap_or_default();
        let goals = read_slot(store.as_ref(), StoreSlot::Goals)
            .await
            .unwrap_or_else(defaults::default_goals);
        let sessions = read_slot(store.as_ref(), StoreSlot::Sessions)
            .await
            .unwrap_or_default();
        let activities = read_slot(store.as_ref(), StoreSlot::Activities)
            .await
            .unwrap_or_default();
        let syllabus = read_slot(store.as_ref(), StoreSlot::Syllabus)
            .await
            .unwrap_or_else(defaults::default_syllabus);

        // Badges are not persisted; they are reseeded and re-evaluated
        // against the loaded counters.
        let mut badges = defaults::default_badges();
        stats::unlock_badges(&mut badges, &stats);

        Self {
            store,
            stats,
            goals,
            sessions,
            activities,
            syllabus,
            badges,
        }
    }

    // --- Read Side ---

    pub fn stats(&self) -> &UserStats {
        &self.stats
    }

    pub fn goals(&self) -> &[Goal] {
        &self.goals
    }

    pub fn sessions(&self) -> &[ReadingSession] {
        &self.sessions
    }

    /// The activity feed, newest first.
    pub fn activities(&self) -> &[ActivityItem] {
        &self.activities
    }

    pub fn badges(&self) -> &[Badge] {
        &self.badges
    }

    pub fn syllabus(&self) -> &SyllabusState {
        &self.syllabus
    }

    /// Today's derived stats over the current session log.
    pub fn today_stats(&self) -> TodayStats {
        stats::today_stats(&self.sessions, Utc::now().date_naive())
    }

    pub fn next_level_xp(&self) -> u32 {
        stats::xp_for_next_level(&self.stats)
    }

    /// The tail of the session log, for insight generation.
    pub fn recent_sessions(&self, limit: usize) -> &[ReadingSession] {
        let start = self.sessions.len().saturating_sub(limit);
        &self.sessions[start..]
    }

    /// Today's schedule recommendation (derived, never persisted).
    pub fn today_schedule(&self) -> ScheduleRecommendation {
        self.syllabus.today_schedule(Utc::now().date_naive())
    }

    // --- Session / Goal Mutations ---

    /// Appends a session and applies its stat effects: speed tests set the
    /// current WPM, writing time and reading time accumulate separately,
    /// and every save pays out xp and coins regardless of kind.
    pub async fn save_session(&mut self, session: ReadingSession) -> Feedback {
        if session.kind == SessionKind::SpeedTest {
            self.stats.current_wpm = session.wpm;
        }
        let minutes = stats::minutes_rounded(session.duration_seconds);
        if session.kind == SessionKind::Writing {
            self.stats.total_time_written_minutes += minutes;
        } else {
            self.stats.total_time_read_minutes += minutes;
        }
        self.stats.total_pages_read += session.pages.unwrap_or(0);
        self.stats.xp += 100;
        self.stats.coins += 20;

        self.sessions.push(session);
        stats::unlock_badges(&mut self.badges, &self.stats);

        self.persist(StoreSlot::Sessions).await;
        self.persist(StoreSlot::Stats).await;
        Feedback::heavy()
    }

    /// Flips a goal's completion. Completing pays out 50 xp / 10 coins and
    /// logs the completion; un-completing claws the payout back (clamped at
    /// zero) and logs nothing. Unknown ids are a no-op.
    pub async fn toggle_goal(&mut self, id: Uuid) -> Option<Feedback> {
        let goal = self.goals.iter_mut().find(|g| g.id == id)?;
        goal.completed = !goal.completed;
        let completed = goal.completed;
        let title = goal.title.clone();
        let subject = goal.subject.clone();

        let feedback = if completed {
            self.stats.xp += 50;
            self.stats.coins += 10;
            self.log_activity(ActivityItem::new(
                ActivityKind::Goal,
                ActivitySubtype::Completion,
                format!("Completed goal: {title}"),
                subject,
            ))
            .await;
            Feedback::celebration()
        } else {
            self.stats.xp = self.stats.xp.saturating_sub(50);
            self.stats.coins = self.stats.coins.saturating_sub(10);
            Feedback::light()
        };

        stats::unlock_badges(&mut self.badges, &self.stats);
        self.persist(StoreSlot::Goals).await;
        self.persist(StoreSlot::Stats).await;
        Some(feedback)
    }

    /// Appends a goal and logs its creation.
    pub async fn add_goal(&mut self, goal: Goal) -> Feedback {
        self.log_activity(ActivityItem::new(
            ActivityKind::Goal,
            ActivitySubtype::Creation,
            format!("New goal set: {}", goal.title),
            goal.subject.clone(),
        ))
        .await;
        self.goals.push(goal);
        self.persist(StoreSlot::Goals).await;
        Feedback::medium()
    }

    /// Removes a goal unconditionally; deletions are not activity-logged.
    pub async fn delete_goal(&mut self, id: Uuid) -> Feedback {
        self.goals.retain(|g| g.id != id);
        self.persist(StoreSlot::Goals).await;
        Feedback::medium()
    }

    /// Lands an active timer. A zero-length run records nothing. Otherwise
    /// the elapsed time becomes an unmeasured session, and in reading mode
    /// every minutes-unit goal accumulates the whole minutes elapsed,
    /// whatever its period.
    pub async fn stop_timer(&mut self, elapsed_seconds: u32, mode: TimerMode) -> Option<Feedback> {
        if elapsed_seconds == 0 {
            return None;
        }

        let kind = match mode {
            TimerMode::Writing => SessionKind::Writing,
            TimerMode::Reading => SessionKind::ManualLog,
        };
        let session = ReadingSession {
            id: Uuid::new_v4(),
            date: Utc::now(),
            duration_seconds: elapsed_seconds,
            wpm: 0,
            pages: None,
            kind,
            passage_title: None,
            subject: None,
        };
        let feedback = self.save_session(session).await;

        if mode == TimerMode::Reading {
            let minutes = elapsed_seconds / 60;
            for goal in &mut self.goals {
                if goal.unit == GoalUnit::Minutes {
                    goal.current += minutes;
                }
            }
            self.persist(StoreSlot::Goals).await;
        }

        Some(feedback)
    }

    /// Manually overwrites the current reading speed.
    pub async fn set_current_wpm(&mut self, wpm: u32) -> Feedback {
        self.stats.current_wpm = wpm;
        stats::unlock_badges(&mut self.badges, &self.stats);
        self.persist(StoreSlot::Stats).await;
        Feedback::light()
    }

    // --- Syllabus Mutations ---

    /// Cycles a chapter and logs the started/completed transitions.
    pub async fn toggle_chapter(
        &mut self,
        subject_index: usize,
        chapter_id: &str,
    ) -> Option<ChapterEvent> {
        let event = self.syllabus.toggle_chapter(subject_index, chapter_id);
        match &event {
            Some(ChapterEvent::Started { title, subject }) => {
                self.log_activity(ActivityItem::new(
                    ActivityKind::Syllabus,
                    ActivitySubtype::Progress,
                    format!("Started: {title}"),
                    Some(subject.clone()),
                ))
                .await;
            }
            Some(ChapterEvent::Completed { title, subject }) => {
                self.log_activity(ActivityItem::new(
                    ActivityKind::Syllabus,
                    ActivitySubtype::Completion,
                    format!("Completed: {title}"),
                    Some(subject.clone()),
                ))
                .await;
            }
            None => {}
        }
        self.persist(StoreSlot::Syllabus).await;
        event
    }

    pub async fn add_chapter(&mut self, subject_index: usize, title: &str) -> Option<Chapter> {
        let chapter = self.syllabus.add_chapter(subject_index, title).cloned();
        if chapter.is_some() {
            self.persist(StoreSlot::Syllabus).await;
        }
        chapter
    }

    pub async fn delete_chapter(&mut self, subject_index: usize, chapter_id: &str) -> bool {
        let removed = self.syllabus.delete_chapter(subject_index, chapter_id);
        if removed {
            self.persist(StoreSlot::Syllabus).await;
        }
        removed
    }

    /// Clears all chapter progress. The confirmation dialog lives upstream.
    pub async fn reset_syllabus(&mut self) {
        self.syllabus.reset();
        self.persist(StoreSlot::Syllabus).await;
    }

    pub async fn cycle_schedule(&mut self) {
        self.syllabus.cycle_schedule();
        self.persist(StoreSlot::Syllabus).await;
    }

    pub async fn set_buffer_day(&mut self, enabled: bool) {
        self.syllabus.set_buffer_day(enabled);
        self.persist(StoreSlot::Syllabus).await;
    }

    // --- Internals ---

    async fn log_activity(&mut self, item: ActivityItem) {
        // Newest first.
        self.activities.insert(0, item);
        self.persist(StoreSlot::Activities).await;
    }

    /// Mirrors one slot to the store. Write failures are logged and
    /// swallowed; the in-memory state stays authoritative.
    async fn persist(&self, slot: StoreSlot) {
        let serialized = match slot {
            StoreSlot::Stats => serde_json::to_value(&self.stats),
            StoreSlot::Goals => serde_json::to_value(&self.goals),
            StoreSlot::Sessions => serde_json::to_value(&self.sessions),
            StoreSlot::Activities => serde_json::to_value(&self.activities),
            StoreSlot::Syllabus => serde_json::to_value(&self.syllabus),
        };
        match serialized {
            Ok(value) => {
                if let Err(e) = self.store.write(slot, &value).await {
                    warn!(slot = slot.key(), error = %e, "store write failed");
                }
            }
            Err(e) => warn!(slot = slot.key(), error = %e, "could not serialize slot"),
        }
    }
}

async fn read_slot<T: DeserializeOwned>(store: &dyn StateStore, slot: StoreSlot) -> Option<T> {
    match store.read(slot).await {
        Ok(Some(value)) => match serde_json::from_value(value) {
            Ok(parsed) => Some(parsed),
            Err(e) => {
                warn!(slot = slot.key(), error = %e, "stored slot is unreadable, using defaults");
                None
            }
        },
        Ok(None) => None,
        Err(e) => {
            warn!(slot = slot.key(), error = %e, "store read failed, using defaults");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::GoalPeriod;
    use crate::ports::{PortError, PortResult};
    use async_trait::async_trait;
    use serde_json::Value;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// In-memory store stub for exercising the tracker end to end.
    #[derive(Default)]
    struct MemoryStore {
        slots: Mutex<HashMap<&'static str, Value>>,
    }

    #[async_trait]
    impl StateStore for MemoryStore {
        async fn read(&self, slot: StoreSlot) -> PortResult<Option<Value>> {
            Ok(self.slots.lock().unwrap().get(slot.key()).cloned())
        }

        async fn write(&self, slot: StoreSlot, value: &Value) -> PortResult<()> {
            self.slots.lock().unwrap().insert(slot.key(), value.clone());
            Ok(())
        }
    }

    /// A store whose writes always fail, for the fire-and-forget path.
    struct BrokenStore;

    #[async_trait]
    impl StateStore for BrokenStore {
        async fn read(&self, _slot: StoreSlot) -> PortResult<Option<Value>> {
            Err(PortError::Unexpected("disk on fire".to_string()))
        }

        async fn write(&self, _slot: StoreSlot, _value: &Value) -> PortResult<()> {
            Err(PortError::Unexpected("disk on fire".to_string()))
        }
    }

    async fn fresh_tracker() -> Tracker {
        Tracker::load(Arc::new(MemoryStore::default())).await
    }

    fn speed_test_session(wpm: u32, duration: u32) -> ReadingSession {
        ReadingSession {
            id: Uuid::new_v4(),
            date: Utc::now(),
            duration_seconds: duration,
            wpm,
            pages: Some(0),
            kind: SessionKind::SpeedTest,
            passage_title: None,
            subject: None,
        }
    }

    #[tokio::test]
    async fn loads_defaults_from_an_empty_store() {
        let tracker = fresh_tracker().await;
        assert_eq!(tracker.stats().xp, 0);
        assert_eq!(tracker.stats().level, 1);
        assert_eq!(tracker.goals().len(), 3);
        assert_eq!(tracker.badges().len(), 3);
        assert!(tracker.sessions().is_empty());
        assert_eq!(tracker.syllabus().subjects.len(), 6);
    }

    #[tokio::test]
    async fn loads_defaults_when_slots_are_malformed() {
        let store = Arc::new(MemoryStore::default());
        store
            .write(StoreSlot::Stats, &serde_json::json!("nonsense"))
            .await
            .unwrap();
        store
            .write(StoreSlot::Goals, &serde_json::json!({"not": "a list"}))
            .await
            .unwrap();
        let tracker = Tracker::load(store).await;
        assert_eq!(tracker.stats().level, 1);
        assert_eq!(tracker.goals().len(), 3);
    }

    #[tokio::test]
    async fn state_round_trips_through_the_store() {
        let store = Arc::new(MemoryStore::default());
        let mut tracker = Tracker::load(store.clone()).await;
        tracker.save_session(speed_test_session(250, 60)).await;
        let goal_id = tracker.goals()[0].id;
        tracker.toggle_goal(goal_id).await;

        let reloaded = Tracker::load(store).await;
        assert_eq!(reloaded.sessions().len(), 1);
        assert_eq!(reloaded.stats().xp, 150);
        assert!(reloaded.goals()[0].completed);
        assert_eq!(reloaded.activities().len(), 1);
    }

    #[tokio::test]
    async fn a_broken_store_never_breaks_mutations() {
        let mut tracker = Tracker::load(Arc::new(BrokenStore)).await;
        tracker.save_session(speed_test_session(250, 60)).await;
        assert_eq!(tracker.sessions().len(), 1);
        assert_eq!(tracker.stats().xp, 100);
    }

    #[tokio::test]
    async fn save_session_applies_all_stat_effects() {
        let mut tracker = fresh_tracker().await;
        let feedback = tracker.save_session(speed_test_session(250, 60)).await;

        let stats = tracker.stats();
        assert_eq!(stats.xp, 100);
        assert_eq!(stats.coins, 20);
        assert_eq!(stats.total_time_read_minutes, 1);
        assert_eq!(stats.total_pages_read, 0);
        assert_eq!(stats.current_wpm, 250);
        assert_eq!(feedback.haptic, Haptic::Heavy);
        // Session saves are never activity-logged.
        assert!(tracker.activities().is_empty());
    }

    #[tokio::test]
    async fn only_speed_tests_set_current_wpm() {
        let mut tracker = fresh_tracker().await;
        tracker.save_session(speed_test_session(250, 60)).await;
        let manual = ReadingSession {
            wpm: 90,
            kind: SessionKind::ManualLog,
            ..speed_test_session(90, 600)
        };
        tracker.save_session(manual).await;
        assert_eq!(tracker.stats().current_wpm, 250);
    }

    #[tokio::test]
    async fn writing_sessions_accumulate_written_minutes() {
        let mut tracker = fresh_tracker().await;
        let writing = ReadingSession {
            kind: SessionKind::Writing,
            wpm: 0,
            ..speed_test_session(0, 600)
        };
        tracker.save_session(writing).await;
        assert_eq!(tracker.stats().total_time_written_minutes, 10);
        assert_eq!(tracker.stats().total_time_read_minutes, 0);
    }

    #[tokio::test]
    async fn goal_toggle_round_trips_xp_and_coins() {
        let mut tracker = fresh_tracker().await;
        tracker.stats.xp = 20;
        tracker.stats.coins = 5;
        let id = tracker.goals()[0].id;

        let feedback = tracker.toggle_goal(id).await.unwrap();
        assert!(feedback.celebrate);
        assert_eq!(tracker.stats().xp, 70);
        assert_eq!(tracker.stats().coins, 15);
        assert_eq!(tracker.activities().len(), 1);
        assert_eq!(tracker.activities()[0].subtype, ActivitySubtype::Completion);

        let feedback = tracker.toggle_goal(id).await.unwrap();
        assert!(!feedback.celebrate);
        assert_eq!(tracker.stats().xp, 20);
        assert_eq!(tracker.stats().coins, 5);
        // Un-completing is not logged.
        assert_eq!(tracker.activities().len(), 1);
    }

    #[tokio::test]
    async fn clawback_clamps_at_zero() {
        let mut tracker = fresh_tracker().await;
        tracker.stats.coins = 3;
        let id = tracker.goals()[0].id;
        tracker.toggle_goal(id).await;
        tracker.stats.xp = 10;
        tracker.toggle_goal(id).await;
        assert_eq!(tracker.stats().xp, 0);
        assert_eq!(tracker.stats().coins, 3);
    }

    #[tokio::test]
    async fn toggling_an_unknown_goal_is_a_no_op() {
        let mut tracker = fresh_tracker().await;
        assert!(tracker.toggle_goal(Uuid::new_v4()).await.is_none());
        assert_eq!(tracker.stats().xp, 0);
    }

    #[tokio::test]
    async fn toggle_never_touches_goal_progress() {
        let mut tracker = fresh_tracker().await;
        tracker.goals[0].current = 12;
        let id = tracker.goals()[0].id;
        tracker.toggle_goal(id).await;
        assert_eq!(tracker.goals()[0].current, 12);
    }

    #[tokio::test]
    async fn add_and_delete_goal() {
        let mut tracker = fresh_tracker().await;
        let goal = Goal {
            id: Uuid::new_v4(),
            title: "Read a paper".to_string(),
            target: 1,
            current: 0,
            unit: GoalUnit::Pages,
            period: GoalPeriod::Weekly,
            completed: false,
            reminder_time: None,
            subject: Some("Science".to_string()),
        };
        let id = goal.id;
        tracker.add_goal(goal).await;
        assert_eq!(tracker.goals().len(), 4);
        assert_eq!(tracker.activities()[0].subtype, ActivitySubtype::Creation);
        assert_eq!(
            tracker.activities()[0].description,
            "New goal set: Read a paper"
        );

        tracker.delete_goal(id).await;
        assert_eq!(tracker.goals().len(), 3);
        // Deletions are not logged.
        assert_eq!(tracker.activities().len(), 1);
    }

    #[tokio::test]
    async fn stop_timer_feeds_every_minutes_goal_regardless_of_period() {
        let mut tracker = fresh_tracker().await;
        tracker
            .add_goal(Goal {
                id: Uuid::new_v4(),
                title: "Deep reading".to_string(),
                target: 120,
                current: 0,
                unit: GoalUnit::Minutes,
                period: GoalPeriod::Monthly,
                completed: false,
                reminder_time: None,
                subject: None,
            })
            .await;

        let feedback = tracker.stop_timer(125, TimerMode::Reading).await;
        assert!(feedback.is_some());

        let session = tracker.sessions().last().unwrap();
        assert_eq!(session.duration_seconds, 125);
        assert_eq!(session.wpm, 0);
        assert_eq!(session.kind, SessionKind::ManualLog);

        // Whole minutes only, and monthly minute goals count too.
        for goal in tracker.goals().iter().filter(|g| g.unit == GoalUnit::Minutes) {
            assert_eq!(goal.current, 2, "goal {:?}", goal.title);
        }
        for goal in tracker.goals().iter().filter(|g| g.unit == GoalUnit::Pages) {
            assert_eq!(goal.current, 0);
        }
    }

    #[tokio::test]
    async fn writing_timers_do_not_touch_goals() {
        let mut tracker = fresh_tracker().await;
        tracker.stop_timer(300, TimerMode::Writing).await;
        assert!(tracker.goals().iter().all(|g| g.current == 0));
        assert_eq!(tracker.sessions().last().unwrap().kind, SessionKind::Writing);
    }

    #[tokio::test]
    async fn zero_second_timers_record_nothing() {
        let mut tracker = fresh_tracker().await;
        assert!(tracker.stop_timer(0, TimerMode::Reading).await.is_none());
        assert!(tracker.sessions().is_empty());
        assert_eq!(tracker.stats().xp, 0);
    }

    #[tokio::test]
    async fn speed_test_can_unlock_the_speed_badge() {
        let mut tracker = fresh_tracker().await;
        tracker.save_session(speed_test_session(320, 60)).await;
        let badge = tracker.badges().iter().find(|b| b.id == "speed-demon").unwrap();
        assert!(badge.unlocked);
    }

    #[tokio::test]
    async fn manual_wpm_override_updates_and_unlocks() {
        let mut tracker = fresh_tracker().await;
        let feedback = tracker.set_current_wpm(305).await;
        assert_eq!(feedback.haptic, Haptic::Light);
        assert_eq!(tracker.stats().current_wpm, 305);
        assert!(tracker.badges().iter().any(|b| b.id == "speed-demon" && b.unlocked));
    }

    #[tokio::test]
    async fn chapter_toggles_log_start_and_completion_only() {
        let mut tracker = fresh_tracker().await;

        tracker.toggle_chapter(1, "r1").await;
        tracker.toggle_chapter(1, "r1").await;
        tracker.toggle_chapter(1, "r1").await;

        assert_eq!(tracker.activities().len(), 2);
        // Newest first: completion, then the start.
        assert_eq!(tracker.activities()[0].description, "Completed: Parada (Mercury) Processing");
        assert_eq!(tracker.activities()[0].subtype, ActivitySubtype::Completion);
        assert_eq!(tracker.activities()[1].subtype, ActivitySubtype::Progress);
        assert_eq!(tracker.activities()[1].description, "Started: Parada (Mercury) Processing");
        assert_eq!(
            tracker.activities()[0].subject.as_deref(),
            Some("Rasashastra")
        );
    }

    #[tokio::test]
    async fn recent_sessions_returns_the_tail() {
        let mut tracker = fresh_tracker().await;
        for _ in 0..12 {
            tracker.save_session(speed_test_session(200, 60)).await;
        }
        assert_eq!(tracker.recent_sessions(10).len(), 10);
        assert_eq!(tracker.recent_sessions(100).len(), 12);
    }
}
