use std::time::Instant;

use crate::model::{AvailabilityReport, Room, RoomType, StayRange};
use crate::store::BookingFilter;

use super::{Engine, EngineError, storage};

impl Engine {
    /// Free inventory for a room type over a half-open date window.
    ///
    /// Counts every stored booking of the type whose stay overlaps the
    /// window; back-to-back stays sharing a boundary date never conflict.
    /// Read-only; on its own this is a point-in-time answer, which is why
    /// booking creation re-runs it under the room-type guard.
    pub async fn check_availability(
        &self,
        room_type: RoomType,
        range: &StayRange,
    ) -> Result<AvailabilityReport, EngineError> {
        let room = self.room_by_type(room_type).await?;
        self.availability_for(&room, range).await
    }

    pub(super) async fn availability_for(
        &self,
        room: &Room,
        range: &StayRange,
    ) -> Result<AvailabilityReport, EngineError> {
        let started = Instant::now();
        let filter = BookingFilter {
            room_type: Some(room.room_type),
            overlapping: Some(*range),
            ..Default::default()
        };
        let booked = self
            .bookings
            .count(&filter)
            .await
            .map_err(storage("count_overlapping"))?;
        let booked = clamp_count(booked);

        metrics::counter!(crate::observability::AVAILABILITY_CHECKS_TOTAL).increment(1);
        metrics::histogram!(crate::observability::AVAILABILITY_CHECK_DURATION_SECONDS)
            .record(started.elapsed().as_secs_f64());

        Ok(AvailabilityReport::new(room.total_rooms, booked))
    }
}

/// Saturating narrowing for the report. Any count past `u32::MAX` already
/// dwarfs every capacity, so clamping keeps the report unavailable without
/// wrapping.
fn clamp_count(count: usize) -> u32 {
    u32::try_from(count).unwrap_or(u32::MAX)
}
