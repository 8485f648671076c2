use crate::compose::track::Track;
use crate::foundation::error::{StillclipError, StillclipResult};
use crate::foundation::time::{Duration, TimeRange};

/// One repetition of the source placed on the destination timeline.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize)]
pub struct PlanSegment {
    /// Offset into the source where this repetition starts reading. Always zero for loops.
    pub source_offset: Duration,
    /// Length read from the source (and written to the destination).
    pub source_length: Duration,
    /// Destination timeline position of the first sample.
    pub destination_start: Duration,
}

/// Ordered stitching instructions that cover a target length with repeats of a source.
///
/// Built only by [`compute_audio_loop_plan`] and never mutated afterwards.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct CompositionPlan {
    source_length: Duration,
    target_length: Duration,
    segments: Vec<PlanSegment>,
}

impl CompositionPlan {
    /// Segments in destination order.
    pub fn segments(&self) -> &[PlanSegment] {
        &self.segments
    }

    /// Number of segments.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// `true` for a zero-length target.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Length of the looped source.
    pub fn source_length(&self) -> Duration {
        self.source_length
    }

    /// Length the plan was computed to cover.
    pub fn target_length(&self) -> Duration {
        self.target_length
    }

    /// Sum of all segment lengths.
    pub fn total_length(&self) -> StillclipResult<Duration> {
        self.segments
            .iter()
            .try_fold(Duration::ZERO, |acc, s| acc.checked_add(s.source_length))
    }

    /// Number of untruncated repetitions of the source.
    pub fn loop_count(&self) -> usize {
        self.segments
            .iter()
            .filter(|s| s.source_length == self.source_length)
            .count()
    }

    /// `true` when the last repetition is cut short.
    pub fn is_truncated(&self) -> bool {
        self.segments
            .last()
            .is_some_and(|s| s.source_length < self.source_length)
    }
}

/// Plan how to loop a `source`-long clip so it covers exactly `target`.
///
/// Every segment restarts the source at offset zero and has length
/// `min(source, target - covered)`, so only the final one can be truncated and the lengths sum to
/// `target` with no gap or overshoot. Fails with `InvalidInput` when `source` is zero or
/// invalid (a zero-length source would never cover anything) or when `target` is invalid.
#[tracing::instrument(level = "debug")]
pub fn compute_audio_loop_plan(
    source: Duration,
    target: Duration,
) -> StillclipResult<CompositionPlan> {
    if !source.is_valid() || source.is_zero() {
        return Err(StillclipError::invalid_input(format!(
            "audio source duration must be > 0 (got {source})"
        )));
    }
    if !target.is_valid() {
        return Err(StillclipError::invalid_input(
            "target duration must be a valid duration",
        ));
    }

    // Invariant: track.total_length() <= target; each pass adds min(source, remaining) > 0.
    let mut track = Track::new();
    while track.total_length() < target {
        let covered = track.total_length();
        let remaining = target.checked_sub(covered)?;
        let length = source.min(remaining);
        track.insert_time_range(TimeRange::new(Duration::ZERO, length)?, covered)?;
    }

    let segments: Vec<PlanSegment> = track
        .into_segments()
        .into_iter()
        .map(|s| PlanSegment {
            source_offset: s.source.start,
            source_length: s.source.length,
            destination_start: s.destination_start,
        })
        .collect();

    tracing::debug!(segments = segments.len(), %source, %target, "audio loop planned");
    Ok(CompositionPlan {
        source_length: source,
        target_length: target,
        segments,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/compose/plan.rs"]
mod tests;
