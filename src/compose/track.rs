use crate::foundation::error::{StillclipError, StillclipResult};
use crate::foundation::time::{Duration, TimeRange};

/// One inserted piece of source media placed on a destination timeline.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct TrackSegment {
    /// Range read from the source.
    pub source: TimeRange,
    /// Where the range lands on the destination timeline.
    pub destination_start: Duration,
}

/// Destination track that only grows at its end.
///
/// Segments are kept in insertion order and `total_length` is the running sum of their lengths,
/// so the track is always gap-free.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Track {
    segments: Vec<TrackSegment>,
    total_length: Duration,
}

impl Track {
    /// Empty track.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `source` at `at`, which must equal the current end of the track.
    pub fn insert_time_range(&mut self, source: TimeRange, at: Duration) -> StillclipResult<()> {
        if at != self.total_length {
            return Err(StillclipError::invalid_input(format!(
                "track insert at {at} would leave a gap or overlap (track ends at {})",
                self.total_length
            )));
        }
        let total_length = self.total_length.checked_add(source.length)?;
        self.segments.push(TrackSegment {
            source,
            destination_start: at,
        });
        self.total_length = total_length;
        Ok(())
    }

    /// Inserted segments in destination order.
    pub fn segments(&self) -> &[TrackSegment] {
        &self.segments
    }

    /// Sum of all inserted lengths.
    pub fn total_length(&self) -> Duration {
        self.total_length
    }

    pub(crate) fn into_segments(self) -> Vec<TrackSegment> {
        self.segments
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compose/track.rs"]
mod tests;
