//! The booking availability and lifecycle engine.
//!
//! Stateless request/response orchestration over the store traits: every
//! operation gates on role (and, per record, ownership), validates its
//! input, and raises structured [`EngineError`]s to the caller. The only
//! in-process state is a per-room-type lock registry that serializes the
//! availability-read/insert window, closing the read-then-write oversell
//! race of the baseline design.

mod access;
mod availability;
mod error;
mod mutations;
mod pricing;
mod queries;
mod validate;

pub use access::{ensure_owner, require_caller, require_role};
pub use error::{EngineError, FieldError};
pub use pricing::quote_stay;

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};
use ulid::Ulid;

use crate::config::EngineConfig;
use crate::model::{Booking, Caller, Room, RoomType};
use crate::store::{BookingStore, RoomStore, StoreError};

pub struct Engine {
    config: EngineConfig,
    rooms: Arc<dyn RoomStore>,
    bookings: Arc<dyn BookingStore>,
    /// Per-room-type guards; hold one across a capacity check and the write
    /// that depends on it.
    room_locks: DashMap<RoomType, Arc<Mutex<()>>>,
}

impl Engine {
    pub fn new(
        config: EngineConfig,
        rooms: Arc<dyn RoomStore>,
        bookings: Arc<dyn BookingStore>,
    ) -> Self {
        Self {
            config,
            rooms,
            bookings,
            room_locks: DashMap::new(),
        }
    }

    pub(super) async fn room_guard(&self, room_type: RoomType) -> OwnedMutexGuard<()> {
        let lock = self
            .room_locks
            .entry(room_type)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        lock.lock_owned().await
    }

    pub(super) async fn room_by_type(&self, room_type: RoomType) -> Result<Room, EngineError> {
        self.rooms
            .get_by_type(room_type)
            .await
            .map_err(storage("get_room_by_type"))?
            .ok_or_else(|| EngineError::room_not_found(room_type))
    }

    pub(super) async fn load_booking(&self, id: Ulid) -> Result<Booking, EngineError> {
        self.bookings
            .get(&id)
            .await
            .map_err(storage("get_booking"))?
            .ok_or_else(|| EngineError::booking_not_found(id))
    }

    /// Ownership-checked lookup used by every per-record lifecycle operation.
    /// Absence reports `NotFound` before ownership reports `Forbidden`.
    pub(super) async fn load_booking_for(
        &self,
        caller: &Caller,
        id: Ulid,
    ) -> Result<Booking, EngineError> {
        let booking = self.load_booking(id).await?;
        access::ensure_owner(caller, &booking.created_by)?;
        Ok(booking)
    }
}

/// Wrap a storage failure with the operation that hit it.
pub(super) fn storage(op: &'static str) -> impl FnOnce(StoreError) -> EngineError {
    move |source| EngineError::Storage { op, source }
}
