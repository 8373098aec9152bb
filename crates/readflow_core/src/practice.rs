//! crates/readflow_core/src/practice.rs
//!
//! The speed-test state machine and the manual-log estimator. The
//! stopwatch itself lives here as instants handed in by the caller, so the
//! whole flow stays deterministic under test.

use crate::domain::{ReadingPassage, ReadingSession, SessionKind};
use chrono::{DateTime, Utc};
use std::time::Instant;
use uuid::Uuid;

/// Estimated words per page for manually logged reading.
pub const WORDS_PER_PAGE: u32 = 250;

/// Subjects offered for passage generation: the curriculum plus a handful
/// of general topics.
pub const TOPICS: [&str; 13] = [
    "Dravyaguna",
    "Rasashastra",
    "Swasthavritta",
    "Roganidana",
    "Samhita",
    "Agadatantra",
    "General Knowledge",
    "Science",
    "History",
    "Technology",
    "Fiction",
    "Philosophy",
    "Business",
];

/// One speed-test attempt: ready (passage fetched) → reading (stopwatch
/// running) → finished (elapsed frozen). Transitions out of order leave
/// the attempt unchanged.
#[derive(Debug, Clone)]
pub enum SpeedTest {
    Ready {
        passage: ReadingPassage,
        subject: String,
    },
    Reading {
        passage: ReadingPassage,
        subject: String,
        started_at: Instant,
    },
    Finished {
        passage: ReadingPassage,
        subject: String,
        elapsed_seconds: u32,
    },
}

impl SpeedTest {
    pub fn ready(passage: ReadingPassage, subject: impl Into<String>) -> Self {
        SpeedTest::Ready {
            passage,
            subject: subject.into(),
        }
    }

    pub fn passage(&self) -> &ReadingPassage {
        match self {
            SpeedTest::Ready { passage, .. }
            | SpeedTest::Reading { passage, .. }
            | SpeedTest::Finished { passage, .. } => passage,
        }
    }

    /// Starts the stopwatch.
    pub fn begin(self, now: Instant) -> Self {
        match self {
            SpeedTest::Ready { passage, subject } => SpeedTest::Reading {
                passage,
                subject,
                started_at: now,
            },
            other => other,
        }
    }

    /// Stops the stopwatch. Elapsed time is clamped to at least one whole
    /// second so the speed computation can never divide by zero.
    pub fn finish(self, now: Instant) -> Self {
        match self {
            SpeedTest::Reading {
                passage,
                subject,
                started_at,
            } => {
                let elapsed_seconds = now
                    .saturating_duration_since(started_at)
                    .as_secs()
                    .max(1) as u32;
                SpeedTest::Finished {
                    passage,
                    subject,
                    elapsed_seconds,
                }
            }
            other => other,
        }
    }

    pub fn elapsed_seconds(&self) -> Option<u32> {
        match self {
            SpeedTest::Finished { elapsed_seconds, .. } => Some(*elapsed_seconds),
            _ => None,
        }
    }

    /// Measured speed of the finished attempt.
    pub fn wpm(&self) -> Option<u32> {
        match self {
            SpeedTest::Finished {
                passage,
                elapsed_seconds,
                ..
            } => Some(compute_wpm(passage.word_count, *elapsed_seconds)),
            _ => None,
        }
    }

    /// Converts a finished attempt into a speed-test session record.
    pub fn into_session(self, recorded_at: DateTime<Utc>) -> Option<ReadingSession> {
        match self {
            SpeedTest::Finished {
                passage,
                subject,
                elapsed_seconds,
            } => Some(ReadingSession {
                id: Uuid::new_v4(),
                date: recorded_at,
                duration_seconds: elapsed_seconds,
                wpm: compute_wpm(passage.word_count, elapsed_seconds),
                pages: None,
                kind: SessionKind::SpeedTest,
                passage_title: Some(passage.title),
                subject: Some(subject),
            }),
            _ => None,
        }
    }
}

fn compute_wpm(word_count: u32, elapsed_seconds: u32) -> u32 {
    (word_count as f64 / elapsed_seconds.max(1) as f64 * 60.0).round() as u32
}

/// Estimates speed for a manual log: `pages * 250` words over `minutes`.
/// Returns `None` unless both inputs are positive, which is what keeps the
/// submit action disabled in the UI.
pub fn estimate_manual_wpm(minutes: u32, pages: u32) -> Option<u32> {
    if minutes == 0 || pages == 0 {
        return None;
    }
    let words = pages * WORDS_PER_PAGE;
    Some((words as f64 / minutes as f64).round() as u32)
}

/// Builds the manual-log session record, or `None` for non-positive input.
pub fn manual_log_session(
    minutes: u32,
    pages: u32,
    subject: Option<String>,
    recorded_at: DateTime<Utc>,
) -> Option<ReadingSession> {
    let wpm = estimate_manual_wpm(minutes, pages)?;
    Some(ReadingSession {
        id: Uuid::new_v4(),
        date: recorded_at,
        duration_seconds: minutes * 60,
        wpm,
        pages: Some(pages),
        kind: SessionKind::ManualLog,
        passage_title: None,
        subject,
    })
}
