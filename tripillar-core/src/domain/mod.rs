//! Domain types for the synthesis engine

pub mod body;
pub mod subject;
pub mod timeline;

pub use body::{Body, Sign};
pub use subject::SubjectChart;
pub use timeline::{
    BinduCounts, CautionWindow, PeakWindow, QualityLevel, SkipReason, SkippedSample, SubScores,
    TimelinePoint,
};
