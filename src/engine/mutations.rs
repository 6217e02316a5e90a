use chrono::Utc;
use ulid::Ulid;

use crate::model::{
    BookingDraft, BookingPatch, BookingStatus, Caller, RoomDraft, RoomPatch, UserRole,
};
use crate::observability;

use super::{Engine, EngineError, access, pricing, storage, validate};

impl Engine {
    /// Register a room type. Admin only; at most one record per type.
    pub async fn create_room(
        &self,
        caller: Option<&Caller>,
        draft: RoomDraft,
    ) -> Result<Ulid, EngineError> {
        access::require_caller(caller, UserRole::Admin)?;
        validate::room_draft(&draft)?;

        // Guard spans the uniqueness probe and the insert so two concurrent
        // creates of the same type cannot both pass the probe.
        let _guard = self.room_guard(draft.room_type).await;
        if self
            .rooms
            .get_by_type(draft.room_type)
            .await
            .map_err(storage("get_room_by_type"))?
            .is_some()
        {
            return Err(EngineError::DuplicateType(draft.room_type));
        }

        let room = draft.into_room(Ulid::new());
        self.rooms
            .insert(&room)
            .await
            .map_err(storage("insert_room"))?;

        metrics::counter!(observability::ROOMS_CREATED_TOTAL).increment(1);
        tracing::info!(room_id = %room.id, room_type = %room.room_type, "room created");
        Ok(room.id)
    }

    /// Patch a room record by id. Admin only; the room type is immutable.
    pub async fn update_room(
        &self,
        caller: Option<&Caller>,
        id: Ulid,
        patch: RoomPatch,
    ) -> Result<Ulid, EngineError> {
        access::require_caller(caller, UserRole::Admin)?;
        validate::room_patch(&patch)?;

        let mut room = self
            .rooms
            .get(&id)
            .await
            .map_err(storage("get_room"))?
            .ok_or_else(|| EngineError::room_not_found(id))?;
        room.apply(&patch);
        self.rooms
            .update(&room)
            .await
            .map_err(storage("update_room"))?;

        tracing::info!(room_id = %room.id, "room updated");
        Ok(room.id)
    }

    /// Create a booking: validate, re-check availability under the room-type
    /// guard, price the stay, persist as `Pending`/unpaid.
    pub async fn create_booking(
        &self,
        caller: Option<&Caller>,
        draft: BookingDraft,
    ) -> Result<Ulid, EngineError> {
        let caller = access::require_caller(caller, UserRole::User)?;
        let range = validate::booking_draft(&draft)?;

        // Held until the insert lands, so two requests racing for the last
        // unit cannot both observe it free.
        let _guard = self.room_guard(draft.room_type).await;

        let room = self.room_by_type(draft.room_type).await?;
        let report = self.availability_for(&room, &range).await?;
        if !report.is_available {
            return Err(EngineError::RoomUnavailable(draft.room_type));
        }

        let price = pricing::quote_stay(room.price_per_night, &range, draft.guests)?;
        let booking = draft.into_booking(Ulid::new(), price, caller.user_id.clone(), Utc::now());
        self.bookings
            .insert(&booking)
            .await
            .map_err(storage("insert_booking"))?;

        metrics::counter!(observability::BOOKINGS_CREATED_TOTAL).increment(1);
        tracing::info!(
            booking_id = %booking.id,
            room_type = %booking.room_type,
            total = %booking.total_amount,
            "booking created"
        );
        Ok(booking.id)
    }

    /// Patch customer contact fields and notes on an owned booking. Dates,
    /// price, and payment state never change through this path.
    pub async fn update_booking(
        &self,
        caller: Option<&Caller>,
        id: Ulid,
        patch: BookingPatch,
    ) -> Result<Ulid, EngineError> {
        let caller = access::require_caller(caller, UserRole::User)?;
        validate::booking_patch(&patch)?;

        let mut booking = self.load_booking_for(caller, id).await?;
        if booking.status == BookingStatus::Cancelled {
            return Err(EngineError::ImmutableState(id));
        }

        booking.apply(&patch, Utc::now());
        self.bookings
            .update(&booking)
            .await
            .map_err(storage("update_booking"))?;

        tracing::info!(booking_id = %booking.id, "booking updated");
        Ok(booking.id)
    }

    /// Mark a booking paid and confirmed. Admin only.
    pub async fn confirm_payment(&self, caller: Option<&Caller>, id: Ulid) -> Result<(), EngineError> {
        let caller = access::require_caller(caller, UserRole::Admin)?;

        let mut booking = self.load_booking_for(caller, id).await?;
        booking.is_paid = true;
        booking.status = BookingStatus::Confirmed;
        booking.updated_at = Utc::now();
        self.bookings
            .update(&booking)
            .await
            .map_err(storage("update_booking"))?;

        metrics::counter!(observability::PAYMENTS_CONFIRMED_TOTAL).increment(1);
        tracing::info!(booking_id = %booking.id, "payment confirmed");
        Ok(())
    }

    /// Cancel an owned booking. The default is a soft cancel that keeps the
    /// record, marks it paid, and sets the terminal `Cancelled` status; the
    /// `hard_delete` flag removes the record physically, admins only. Anyone
    /// else asking for a hard delete lands on the soft path.
    pub async fn cancel_booking(
        &self,
        caller: Option<&Caller>,
        id: Ulid,
        hard_delete: bool,
    ) -> Result<(), EngineError> {
        let caller = access::require_caller(caller, UserRole::User)?;
        let mut booking = self.load_booking_for(caller, id).await?;

        if hard_delete && caller.is_admin() {
            self.bookings
                .remove(&id)
                .await
                .map_err(storage("remove_booking"))?;
            metrics::counter!(observability::BOOKINGS_DELETED_TOTAL).increment(1);
            tracing::info!(booking_id = %id, "booking deleted");
            return Ok(());
        }

        booking.status = BookingStatus::Cancelled;
        booking.is_paid = true;
        booking.updated_at = Utc::now();
        self.bookings
            .update(&booking)
            .await
            .map_err(storage("update_booking"))?;

        metrics::counter!(observability::BOOKINGS_CANCELLED_TOTAL).increment(1);
        tracing::info!(booking_id = %id, "booking cancelled");
        Ok(())
    }
}
