pub mod defaults;
pub mod domain;
pub mod ports;
pub mod practice;
pub mod stats;
pub mod syllabus;
pub mod tracker;

pub use domain::{
    ActivityItem, Badge, BadgeCondition, Chapter, Goal, GoalPeriod, GoalUnit, ReadingInsight,
    ReadingPassage, ReadingSession, SessionKind, Subject, TodayStats, UserStats,
};
pub use ports::{
    InsightGenerationService, PassageGenerationService, PortError, PortResult, StateStore,
    StoreSlot,
};
pub use practice::SpeedTest;
pub use syllabus::SyllabusState;
pub use tracker::{Feedback, TimerMode, Tracker};
