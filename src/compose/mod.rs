//! Timeline composition: destination tracks and the audio-loop planner.

/// Audio-loop composition planner.
pub mod plan;
/// Append-only destination track.
pub mod track;
