use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ulid::Ulid;
use validator::Validate;

/// Closed set of room categories; the inventory unit of the whole system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoomType {
    Standard,
    Deluxe,
    Suite,
    Luxury,
    Penthouse,
}

impl std::fmt::Display for RoomType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            RoomType::Standard => "Standard",
            RoomType::Deluxe => "Deluxe",
            RoomType::Suite => "Suite",
            RoomType::Luxury => "Luxury",
            RoomType::Penthouse => "Penthouse",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    /// Terminal for content changes; set by soft cancellation.
    Cancelled,
    /// Terminal; never set by this crate's write paths.
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    #[default]
    Cash,
}

/// Caller roles, totally ordered. Compare with `>=`, never by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Guest = 1,
    User = 2,
    Admin = 3,
}

/// Identity resolved by the external provider, passed by value through the
/// call chain. The engine only ever consumes the id and the role.
#[derive(Debug, Clone)]
pub struct Caller {
    pub user_id: String,
    pub role: UserRole,
}

impl Caller {
    pub fn new(user_id: impl Into<String>, role: UserRole) -> Self {
        Self {
            user_id: user_id.into(),
            role,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}

/// Half-open stay interval `[check_in, check_out)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StayRange {
    pub check_in: DateTime<Utc>,
    pub check_out: DateTime<Utc>,
}

impl StayRange {
    pub fn new(check_in: DateTime<Utc>, check_out: DateTime<Utc>) -> Self {
        Self {
            check_in,
            check_out,
        }
    }

    /// Half-open intersection test: a stay ending exactly when another starts
    /// does not conflict.
    pub fn overlaps(&self, other: &StayRange) -> bool {
        self.check_in < other.check_out && other.check_in < self.check_out
    }

    /// Number of billed nights, rounding partial days up. Zero or negative
    /// means the range is not a valid stay.
    pub fn nights(&self) -> i64 {
        let secs = (self.check_out - self.check_in).num_seconds();
        secs.div_euclid(86_400) + i64::from(secs.rem_euclid(86_400) > 0)
    }
}

// ── Rooms ────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    pub id: Ulid,
    pub room_type: RoomType,
    pub name: String,
    pub description: Option<String>,
    /// Guests a single unit sleeps.
    pub capacity: u32,
    /// Units of this type the hotel owns; the availability ceiling.
    pub total_rooms: u32,
    pub price_per_night: Decimal,
    pub amenities: Vec<String>,
    pub available: bool,
}

impl Room {
    pub(crate) fn apply(&mut self, patch: &RoomPatch) {
        if let Some(name) = &patch.name {
            self.name = name.clone();
        }
        if let Some(description) = &patch.description {
            self.description = Some(description.clone());
        }
        if let Some(capacity) = patch.capacity {
            self.capacity = capacity;
        }
        if let Some(total_rooms) = patch.total_rooms {
            self.total_rooms = total_rooms;
        }
        if let Some(price) = patch.price_per_night {
            self.price_per_night = price;
        }
        if let Some(amenities) = &patch.amenities {
            self.amenities = amenities.clone();
        }
        if let Some(available) = patch.available {
            self.available = available;
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RoomDraft {
    pub room_type: RoomType,
    #[validate(length(min = 1, message = "name is mandatory"))]
    pub name: String,
    #[validate(length(max = 500, message = "description cannot exceed 500 characters"))]
    pub description: Option<String>,
    #[validate(range(min = 1, message = "capacity must be a positive integer"))]
    pub capacity: u32,
    #[validate(range(min = 1, message = "total rooms must be a positive integer"))]
    pub total_rooms: u32,
    #[validate(custom(function = positive_price))]
    pub price_per_night: Decimal,
    #[validate(length(min = 1, message = "at least one amenity must be provided"))]
    pub amenities: Vec<String>,
    #[serde(default = "default_available")]
    pub available: bool,
}

impl RoomDraft {
    pub(crate) fn into_room(self, id: Ulid) -> Room {
        Room {
            id,
            room_type: self.room_type,
            name: self.name,
            description: self.description,
            capacity: self.capacity,
            total_rooms: self.total_rooms,
            price_per_night: self.price_per_night,
            amenities: self.amenities,
            available: self.available,
        }
    }
}

/// Partial room update. Absent fields are left untouched; the room type is
/// deliberately not patchable.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RoomPatch {
    #[validate(length(min = 1, message = "name is mandatory"))]
    pub name: Option<String>,
    #[validate(length(max = 500, message = "description cannot exceed 500 characters"))]
    pub description: Option<String>,
    #[validate(range(min = 1, message = "capacity must be a positive integer"))]
    pub capacity: Option<u32>,
    #[validate(range(min = 1, message = "total rooms must be a positive integer"))]
    pub total_rooms: Option<u32>,
    #[validate(custom(function = positive_price))]
    pub price_per_night: Option<Decimal>,
    #[validate(length(min = 1, message = "at least one amenity must be provided"))]
    pub amenities: Option<Vec<String>>,
    pub available: Option<bool>,
}

fn positive_price(value: &Decimal) -> Result<(), validator::ValidationError> {
    if *value > Decimal::ZERO {
        Ok(())
    } else {
        let mut err = validator::ValidationError::new("range");
        err.message = Some("price per night must be positive".into());
        Err(err)
    }
}

fn default_available() -> bool {
    true
}

// ── Bookings ─────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    /// Also duplicated inside the persisted document; the pagination sort key.
    pub id: Ulid,
    pub customer_first_name: String,
    pub customer_last_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    pub room_type: RoomType,
    pub guests: u32,
    #[serde(flatten)]
    pub stay: StayRange,
    pub notes: Option<String>,
    pub payment_method: PaymentMethod,
    /// Computed at creation, immutable afterwards.
    pub service_price: Decimal,
    pub total_amount: Decimal,
    pub is_paid: bool,
    pub status: BookingStatus,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Booking {
    /// Merge content fields only. Dates, price, and status never change
    /// through this path.
    pub(crate) fn apply(&mut self, patch: &BookingPatch, now: DateTime<Utc>) {
        if let Some(first) = &patch.customer_first_name {
            self.customer_first_name = first.clone();
        }
        if let Some(last) = &patch.customer_last_name {
            self.customer_last_name = last.clone();
        }
        if let Some(email) = &patch.customer_email {
            self.customer_email = email.clone();
        }
        if let Some(phone) = &patch.customer_phone {
            self.customer_phone = phone.clone();
        }
        if let Some(notes) = &patch.notes {
            self.notes = Some(notes.clone());
        }
        self.updated_at = now;
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct BookingDraft {
    #[validate(length(min = 1, message = "customer first name is mandatory"))]
    pub customer_first_name: String,
    #[validate(length(min = 1, message = "customer last name is mandatory"))]
    pub customer_last_name: String,
    #[validate(email(message = "customer email is not valid"))]
    pub customer_email: String,
    #[validate(length(min = 1, max = 13, message = "customer phone is not valid"))]
    pub customer_phone: String,
    pub room_type: RoomType,
    #[validate(range(min = 1, message = "guest count must be positive"))]
    pub guests: u32,
    pub check_in: DateTime<Utc>,
    pub check_out: DateTime<Utc>,
    pub notes: Option<String>,
    #[serde(default)]
    pub payment_method: PaymentMethod,
}

impl BookingDraft {
    pub fn stay(&self) -> StayRange {
        StayRange::new(self.check_in, self.check_out)
    }

    /// Stamp engine-owned defaults onto a validated draft.
    pub(crate) fn into_booking(
        self,
        id: Ulid,
        price: Decimal,
        created_by: String,
        now: DateTime<Utc>,
    ) -> Booking {
        let stay = self.stay();
        Booking {
            id,
            customer_first_name: self.customer_first_name,
            customer_last_name: self.customer_last_name,
            customer_email: self.customer_email,
            customer_phone: self.customer_phone,
            room_type: self.room_type,
            guests: self.guests,
            stay,
            notes: self.notes,
            payment_method: self.payment_method,
            service_price: price,
            total_amount: price,
            is_paid: false,
            status: BookingStatus::Pending,
            created_by,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Partial booking update: customer identity fields and notes only.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct BookingPatch {
    #[validate(length(min = 1, message = "customer first name is mandatory"))]
    pub customer_first_name: Option<String>,
    #[validate(length(min = 1, message = "customer last name is mandatory"))]
    pub customer_last_name: Option<String>,
    #[validate(email(message = "customer email is not valid"))]
    pub customer_email: Option<String>,
    #[validate(length(min = 1, max = 13, message = "customer phone is not valid"))]
    pub customer_phone: Option<String>,
    pub notes: Option<String>,
}

// ── Query inputs ─────────────────────────────────────────────────

/// Reference a room either by its generated id or by its natural key.
#[derive(Debug, Clone, Copy)]
pub enum RoomRef {
    Id(Ulid),
    Type(RoomType),
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RoomQuery {
    pub room_type: Option<RoomType>,
    /// Both bounds or neither; presence switches on derived availability.
    pub check_in: Option<DateTime<Utc>>,
    pub check_out: Option<DateTime<Utc>>,
    pub guests: Option<u32>,
}

#[derive(Debug, Clone, Default)]
pub struct BookingQuery {
    pub room_type: Option<RoomType>,
    /// Both bounds or neither; interpreted as the overlap window.
    pub check_in: Option<DateTime<Utc>>,
    pub check_out: Option<DateTime<Utc>>,
    pub is_paid: Option<bool>,
    /// Admin-only widening past the caller's own bookings.
    pub all_users: bool,
    /// Id of the last item of the previous page.
    pub after: Option<Ulid>,
    pub page_size: Option<usize>,
}

// ── Derived results ──────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityReport {
    pub capacity_total: u32,
    pub booked_count: u32,
    /// Signed so oversell inherited from a store without the creation lock
    /// stays visible instead of saturating away.
    pub free_count: i64,
    pub is_available: bool,
}

impl AvailabilityReport {
    pub fn new(capacity_total: u32, booked_count: u32) -> Self {
        let free_count = i64::from(capacity_total) - i64::from(booked_count);
        Self {
            capacity_total,
            booked_count,
            free_count,
            is_available: free_count > 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomListing {
    #[serde(flatten)]
    pub room: Room,
    /// Present only when the query carried a date window.
    pub available_quantity: Option<i64>,
}

#[derive(Debug, Clone)]
pub struct BookingList {
    pub items: Vec<Booking>,
    /// Cursor for the next page; `None` once the last page is reached.
    pub continuation: Option<Ulid>,
    /// Derived from a short page, so a result set that divides evenly by the
    /// page size costs one extra (empty) fetch to detect the end.
    pub is_last_page: bool,
    /// Matches before pagination.
    pub total_count: usize,
}
