//! Document-store boundary.
//!
//! The engine talks to persistence through [`RoomStore`] and [`BookingStore`]
//! only: equality/range filters, single-record lookup, and cursor pagination
//! ordered by id ascending. [`MemoryRoomStore`] and [`MemoryBookingStore`]
//! round-trip every record through JSON documents so they behave like a real
//! document backend rather than a typed map.

use async_trait::async_trait;
use dashmap::DashMap;
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use ulid::Ulid;

use crate::model::{Booking, Room, RoomType, StayRange};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("serialization: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("backend: {0}")]
    Backend(String),
}

/// Equality/overlap filter over the `bookings` collection.
#[derive(Debug, Clone, Default)]
pub struct BookingFilter {
    pub room_type: Option<RoomType>,
    /// Half-open overlap window, not literal bound equality.
    pub overlapping: Option<StayRange>,
    pub is_paid: Option<bool>,
    pub created_by: Option<String>,
}

impl BookingFilter {
    pub fn matches(&self, booking: &Booking) -> bool {
        if let Some(room_type) = self.room_type
            && booking.room_type != room_type
        {
            return false;
        }
        if let Some(window) = &self.overlapping
            && !booking.stay.overlaps(window)
        {
            return false;
        }
        if let Some(is_paid) = self.is_paid
            && booking.is_paid != is_paid
        {
            return false;
        }
        if let Some(created_by) = &self.created_by
            && booking.created_by != *created_by
        {
            return false;
        }
        true
    }
}

/// Cursor page request: records strictly after `after`, id ascending.
#[derive(Debug, Clone, Copy)]
pub struct PageRequest {
    pub after: Option<Ulid>,
    pub limit: usize,
}

/// One page of matches plus the pre-pagination match count.
#[derive(Debug, Clone)]
pub struct BookingSet {
    pub items: Vec<Booking>,
    pub total_count: usize,
}

#[async_trait]
pub trait RoomStore: Send + Sync {
    async fn insert(&self, room: &Room) -> Result<(), StoreError>;
    /// Full-record overwrite keyed by `room.id`.
    async fn update(&self, room: &Room) -> Result<(), StoreError>;
    async fn get(&self, id: &Ulid) -> Result<Option<Room>, StoreError>;
    /// Lookup by the natural key; the engine guarantees at most one record
    /// per type, backends may assume it.
    async fn get_by_type(&self, room_type: RoomType) -> Result<Option<Room>, StoreError>;
    async fn list(&self, room_type: Option<RoomType>) -> Result<Vec<Room>, StoreError>;
}

#[async_trait]
pub trait BookingStore: Send + Sync {
    async fn insert(&self, booking: &Booking) -> Result<(), StoreError>;
    /// Full-record overwrite keyed by `booking.id`.
    async fn update(&self, booking: &Booking) -> Result<(), StoreError>;
    /// Physical removal. Returns whether a record existed.
    async fn remove(&self, id: &Ulid) -> Result<bool, StoreError>;
    async fn get(&self, id: &Ulid) -> Result<Option<Booking>, StoreError>;
    /// Items must come back ordered by id ascending; the cursor must be
    /// applied by the backend, not by post-filtering a full scan on the
    /// caller's side.
    async fn find(
        &self,
        filter: &BookingFilter,
        page: Option<&PageRequest>,
    ) -> Result<BookingSet, StoreError>;
    async fn count(&self, filter: &BookingFilter) -> Result<usize, StoreError>;
}

// ── In-memory documents ──────────────────────────────────────────

/// One JSON document collection keyed by id.
struct Collection {
    docs: DashMap<Ulid, serde_json::Value>,
}

impl Collection {
    fn new() -> Self {
        Self {
            docs: DashMap::new(),
        }
    }

    fn put<T: Serialize>(&self, id: Ulid, record: &T) -> Result<(), StoreError> {
        self.docs.insert(id, serde_json::to_value(record)?);
        Ok(())
    }

    fn fetch<T: DeserializeOwned>(&self, id: &Ulid) -> Result<Option<T>, StoreError> {
        match self.docs.get(id) {
            Some(doc) => Ok(Some(serde_json::from_value(doc.value().clone())?)),
            None => Ok(None),
        }
    }

    fn scan<T: DeserializeOwned>(&self) -> Result<Vec<T>, StoreError> {
        self.docs
            .iter()
            .map(|entry| serde_json::from_value(entry.value().clone()).map_err(StoreError::from))
            .collect()
    }

    fn remove(&self, id: &Ulid) -> bool {
        self.docs.remove(id).is_some()
    }
}

pub struct MemoryRoomStore {
    rooms: Collection,
}

impl Default for MemoryRoomStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryRoomStore {
    pub fn new() -> Self {
        Self {
            rooms: Collection::new(),
        }
    }
}

#[async_trait]
impl RoomStore for MemoryRoomStore {
    async fn insert(&self, room: &Room) -> Result<(), StoreError> {
        self.rooms.put(room.id, room)
    }

    async fn update(&self, room: &Room) -> Result<(), StoreError> {
        self.rooms.put(room.id, room)
    }

    async fn get(&self, id: &Ulid) -> Result<Option<Room>, StoreError> {
        self.rooms.fetch(id)
    }

    async fn get_by_type(&self, room_type: RoomType) -> Result<Option<Room>, StoreError> {
        let rooms: Vec<Room> = self.rooms.scan()?;
        Ok(rooms.into_iter().find(|r| r.room_type == room_type))
    }

    async fn list(&self, room_type: Option<RoomType>) -> Result<Vec<Room>, StoreError> {
        let mut rooms: Vec<Room> = self.rooms.scan()?;
        if let Some(room_type) = room_type {
            rooms.retain(|r| r.room_type == room_type);
        }
        rooms.sort_by_key(|r| r.id);
        Ok(rooms)
    }
}

pub struct MemoryBookingStore {
    bookings: Collection,
}

impl Default for MemoryBookingStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryBookingStore {
    pub fn new() -> Self {
        Self {
            bookings: Collection::new(),
        }
    }

    fn matching(&self, filter: &BookingFilter) -> Result<Vec<Booking>, StoreError> {
        let mut bookings: Vec<Booking> = self.bookings.scan()?;
        bookings.retain(|b| filter.matches(b));
        bookings.sort_by_key(|b| b.id);
        Ok(bookings)
    }
}

#[async_trait]
impl BookingStore for MemoryBookingStore {
    async fn insert(&self, booking: &Booking) -> Result<(), StoreError> {
        self.bookings.put(booking.id, booking)
    }

    async fn update(&self, booking: &Booking) -> Result<(), StoreError> {
        self.bookings.put(booking.id, booking)
    }

    async fn remove(&self, id: &Ulid) -> Result<bool, StoreError> {
        Ok(self.bookings.remove(id))
    }

    async fn get(&self, id: &Ulid) -> Result<Option<Booking>, StoreError> {
        self.bookings.fetch(id)
    }

    async fn find(
        &self,
        filter: &BookingFilter,
        page: Option<&PageRequest>,
    ) -> Result<BookingSet, StoreError> {
        let mut items = self.matching(filter)?;
        let total_count = items.len();
        if let Some(page) = page {
            if let Some(after) = page.after {
                items.retain(|b| b.id > after);
            }
            items.truncate(page.limit);
        }
        Ok(BookingSet { items, total_count })
    }

    async fn count(&self, filter: &BookingFilter) -> Result<usize, StoreError> {
        Ok(self.matching(filter)?.len())
    }
}
