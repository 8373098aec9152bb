//! crates/readflow_core/src/stats.rs
//!
//! The derived-state engine: pure functions that project the session log
//! and the stat counters into display values. Nothing here mutates the
//! store; callers recompute after each change.

use crate::domain::{Badge, ReadingSession, SessionKind, TodayStats, UserStats};
use chrono::NaiveDate;

/// Whole minutes for a duration, rounded to nearest (half-minute rounds up).
pub(crate) fn minutes_rounded(seconds: u32) -> u32 {
    (seconds + 30) / 60
}

/// Projects the session log onto the given calendar date (UTC).
///
/// `time` counts non-writing sessions only; `pages` counts every session;
/// `wpm` is the rounded mean over sessions with a measured speed, so
/// unmeasured (wpm = 0) sessions never drag the average down. An empty log
/// yields all zeros.
pub fn today_stats(sessions: &[ReadingSession], today: NaiveDate) -> TodayStats {
    let todays: Vec<&ReadingSession> = sessions
        .iter()
        .filter(|s| s.date.date_naive() == today)
        .collect();

    let time = todays
        .iter()
        .filter(|s| s.kind != SessionKind::Writing)
        .map(|s| minutes_rounded(s.duration_seconds))
        .sum();

    let pages = todays.iter().map(|s| s.pages.unwrap_or(0)).sum();

    let measured: Vec<u32> = todays.iter().map(|s| s.wpm).filter(|w| *w > 0).collect();
    let wpm = if measured.is_empty() {
        0
    } else {
        let sum: u32 = measured.iter().sum();
        (sum as f64 / measured.len() as f64).round() as u32
    };

    TodayStats { time, pages, wpm }
}

/// Unlocks every still-locked badge whose condition now holds, returning the
/// ids unlocked by this pass. Idempotent; never re-locks a badge, even when
/// the underlying stat has dropped back below the threshold.
pub fn unlock_badges(badges: &mut [Badge], stats: &UserStats) -> Vec<String> {
    let mut unlocked = Vec::new();
    for badge in badges.iter_mut() {
        if !badge.unlocked && badge.condition.is_met(stats) {
            badge.unlocked = true;
            unlocked.push(badge.id.clone());
        }
    }
    unlocked
}

/// The xp threshold at which the next level would begin. Display-only:
/// nothing in the core ever advances `level`.
pub fn xp_for_next_level(stats: &UserStats) -> u32 {
    stats.level * 1000
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defaults;
    use chrono::NaiveDateTime;
    use uuid::Uuid;

    fn session(date: &str, duration: u32, wpm: u32, pages: Option<u32>, kind: SessionKind) -> ReadingSession {
        ReadingSession {
            id: Uuid::new_v4(),
            date: NaiveDateTime::parse_from_str(date, "%Y-%m-%d %H:%M:%S")
                .unwrap()
                .and_utc(),
            duration_seconds: duration,
            wpm,
            pages,
            kind,
            passage_title: None,
            subject: None,
        }
    }

    fn day(date: &str) -> NaiveDate {
        NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn empty_log_yields_zeros() {
        assert_eq!(today_stats(&[], day("2024-03-01")), TodayStats::default());
    }

    #[test]
    fn single_manual_log_session() {
        let log = vec![session(
            "2024-03-01 09:30:00",
            1800,
            0,
            Some(20),
            SessionKind::ManualLog,
        )];
        let stats = today_stats(&log, day("2024-03-01"));
        assert_eq!(stats, TodayStats { time: 30, pages: 20, wpm: 0 });
    }

    #[test]
    fn sessions_outside_today_never_contribute() {
        let log = vec![
            session("2024-03-01 23:59:00", 600, 200, Some(5), SessionKind::ManualLog),
            session("2024-02-29 10:00:00", 6000, 400, Some(50), SessionKind::ManualLog),
        ];
        let stats = today_stats(&log, day("2024-03-01"));
        assert_eq!(stats, TodayStats { time: 10, pages: 5, wpm: 200 });
    }

    #[test]
    fn writing_sessions_count_pages_but_not_time() {
        let log = vec![
            session("2024-03-01 08:00:00", 1200, 0, None, SessionKind::Writing),
            session("2024-03-01 09:00:00", 600, 0, Some(3), SessionKind::ManualLog),
        ];
        let stats = today_stats(&log, day("2024-03-01"));
        assert_eq!(stats.time, 10);
        assert_eq!(stats.pages, 3);
    }

    #[test]
    fn unmeasured_sessions_do_not_lower_the_average() {
        let log = vec![
            session("2024-03-01 08:00:00", 60, 250, None, SessionKind::SpeedTest),
            session("2024-03-01 09:00:00", 60, 0, None, SessionKind::ManualLog),
            session("2024-03-01 10:00:00", 60, 300, None, SessionKind::SpeedTest),
        ];
        assert_eq!(today_stats(&log, day("2024-03-01")).wpm, 275);
    }

    #[test]
    fn average_wpm_rounds_to_nearest() {
        let log = vec![
            session("2024-03-01 08:00:00", 60, 200, None, SessionKind::SpeedTest),
            session("2024-03-01 09:00:00", 60, 201, None, SessionKind::SpeedTest),
        ];
        // 200.5 rounds up.
        assert_eq!(today_stats(&log, day("2024-03-01")).wpm, 201);
    }

    #[test]
    fn half_minute_durations_round_up() {
        assert_eq!(minutes_rounded(89), 1);
        assert_eq!(minutes_rounded(90), 2);
        assert_eq!(minutes_rounded(0), 0);
    }

    #[test]
    fn badge_unlock_is_monotonic() {
        let mut badges = defaults::default_badges();
        let mut stats = UserStats {
            current_wpm: 320,
            ..UserStats::default()
        };

        let newly = unlock_badges(&mut badges, &stats);
        assert_eq!(newly, vec!["speed-demon".to_string()]);

        // Speed drops back below the threshold: the badge stays unlocked
        // and the pass reports nothing new.
        stats.current_wpm = 100;
        assert!(unlock_badges(&mut badges, &stats).is_empty());
        let speed_demon = badges.iter().find(|b| b.id == "speed-demon").unwrap();
        assert!(speed_demon.unlocked);
    }

    #[test]
    fn next_level_threshold_scales_with_level() {
        let stats = UserStats::default();
        assert_eq!(xp_for_next_level(&stats), 1000);
        let stats = UserStats { level: 4, ..UserStats::default() };
        assert_eq!(xp_for_next_level(&stats), 4000);
    }
}
