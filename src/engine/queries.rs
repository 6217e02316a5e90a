use ulid::Ulid;

use crate::model::{
    Booking, BookingList, BookingQuery, Caller, Room, RoomListing, RoomQuery, RoomRef, UserRole,
};
use crate::observability;
use crate::store::{BookingFilter, PageRequest};

use super::{Engine, EngineError, access, storage, validate};

impl Engine {
    /// Fetch one room by id or by type. Open to unauthenticated callers.
    pub async fn get_room(
        &self,
        caller: Option<&Caller>,
        room: RoomRef,
    ) -> Result<Room, EngineError> {
        access::require_role(caller, UserRole::Guest)?;
        match room {
            RoomRef::Id(id) => self
                .rooms
                .get(&id)
                .await
                .map_err(storage("get_room"))?
                .ok_or_else(|| EngineError::room_not_found(id)),
            RoomRef::Type(room_type) => self.room_by_type(room_type).await,
        }
    }

    /// List the catalog, optionally filtered by type and guest count. When
    /// the query carries a date window, each listing also reports how many
    /// units are free over it, and fully booked types are dropped.
    pub async fn list_rooms(
        &self,
        caller: Option<&Caller>,
        query: &RoomQuery,
    ) -> Result<Vec<RoomListing>, EngineError> {
        access::require_role(caller, UserRole::Guest)?;
        let (window, guests) = validate::room_query(query)?;

        let mut rooms = self
            .rooms
            .list(query.room_type)
            .await
            .map_err(storage("list_rooms"))?;
        if let Some(guests) = guests {
            rooms.retain(|r| r.capacity >= guests);
        }

        let Some(window) = window else {
            return Ok(rooms
                .into_iter()
                .map(|room| RoomListing {
                    room,
                    available_quantity: None,
                })
                .collect());
        };

        // One overlap scan for all types, then a per-type count over it,
        // instead of one store round trip per room.
        let filter = BookingFilter {
            room_type: query.room_type,
            overlapping: Some(window),
            ..Default::default()
        };
        let overlapping = self
            .bookings
            .find(&filter, None)
            .await
            .map_err(storage("find_overlapping"))?
            .items;

        let mut listings = Vec::with_capacity(rooms.len());
        for room in rooms {
            let booked = overlapping
                .iter()
                .filter(|b| b.room_type == room.room_type)
                .count() as i64;
            let free = i64::from(room.total_rooms) - booked;
            if free > 0 {
                listings.push(RoomListing {
                    room,
                    available_quantity: Some(free),
                });
            }
        }
        Ok(listings)
    }

    /// Fetch one booking. Owners see their own; admins see any.
    pub async fn get_booking(
        &self,
        caller: Option<&Caller>,
        id: Ulid,
    ) -> Result<Booking, EngineError> {
        let caller = access::require_caller(caller, UserRole::User)?;
        self.load_booking_for(caller, id).await
    }

    /// Cursor-paginated booking listing. Non-admin callers are always scoped
    /// to their own records; admins widen past that only by asking for
    /// `all_users` explicitly.
    pub async fn list_bookings(
        &self,
        caller: Option<&Caller>,
        query: &BookingQuery,
    ) -> Result<BookingList, EngineError> {
        let caller = access::require_caller(caller, UserRole::User)?;
        let (page_size, window) = validate::booking_query(query, &self.config)?;

        let created_by = if caller.is_admin() && query.all_users {
            None
        } else {
            Some(caller.user_id.clone())
        };
        let filter = BookingFilter {
            room_type: query.room_type,
            overlapping: window,
            is_paid: query.is_paid,
            created_by,
        };
        let page = PageRequest {
            after: query.after,
            limit: page_size,
        };
        let set = self
            .bookings
            .find(&filter, Some(&page))
            .await
            .map_err(storage("find_bookings"))?;

        metrics::histogram!(observability::BOOKING_LIST_PAGE_SIZE)
            .record(set.items.len() as f64);

        // A short page is the end; a full one may cost an extra empty fetch
        // when the matches divide evenly by the page size.
        let is_last_page = set.items.len() < page_size;
        let continuation = if is_last_page {
            None
        } else {
            set.items.last().map(|b| b.id)
        };
        Ok(BookingList {
            items: set.items,
            continuation,
            is_last_page,
            total_count: set.total_count,
        })
    }
}
