//! End-to-end lifecycle over the public engine API with in-memory stores.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use innkeep::config::EngineConfig;
use innkeep::engine::{Engine, EngineError};
use innkeep::model::{
    BookingDraft, BookingPatch, BookingQuery, BookingStatus, Caller, PaymentMethod, RoomDraft,
    RoomQuery, RoomType, StayRange, UserRole,
};
use innkeep::store::{MemoryBookingStore, MemoryRoomStore};

fn engine() -> Engine {
    innkeep::observability::init_tracing();
    Engine::new(
        EngineConfig::default(),
        Arc::new(MemoryRoomStore::new()),
        Arc::new(MemoryBookingStore::new()),
    )
}

fn d(s: &str) -> DateTime<Utc> {
    format!("{s}T00:00:00Z").parse().unwrap()
}

fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

#[tokio::test]
async fn full_booking_lifecycle() {
    let engine = engine();
    let admin = Caller::new("admin-1", UserRole::Admin);
    let guest = Caller::new("guest-7", UserRole::User);

    // Admin registers the inventory.
    engine
        .create_room(
            Some(&admin),
            RoomDraft {
                room_type: RoomType::Suite,
                name: "Garden Suite".into(),
                description: Some("Two-room suite facing the garden".into()),
                capacity: 4,
                total_rooms: 2,
                price_per_night: dec("100"),
                amenities: vec!["wifi".into(), "minibar".into()],
                available: true,
            },
        )
        .await
        .unwrap();

    // An anonymous visitor browses availability for the stay.
    let window = StayRange::new(d("2024-01-01"), d("2024-01-05"));
    let report = engine
        .check_availability(RoomType::Suite, &window)
        .await
        .unwrap();
    assert!(report.is_available);
    assert_eq!(report.free_count, 2);

    let listings = engine
        .list_rooms(
            None,
            &RoomQuery {
                check_in: Some(window.check_in),
                check_out: Some(window.check_out),
                guests: Some(2),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(listings.len(), 1);
    assert_eq!(listings[0].available_quantity, Some(2));

    // The guest books, gets the priced pending record.
    let booking_id = engine
        .create_booking(
            Some(&guest),
            BookingDraft {
                customer_first_name: "Grace".into(),
                customer_last_name: "Hopper".into(),
                customer_email: "grace@example.com".into(),
                customer_phone: "5550100".into(),
                room_type: RoomType::Suite,
                guests: 2,
                check_in: window.check_in,
                check_out: window.check_out,
                notes: None,
                payment_method: PaymentMethod::Cash,
            },
        )
        .await
        .unwrap();

    let booking = engine.get_booking(Some(&guest), booking_id).await.unwrap();
    assert_eq!(booking.total_amount, dec("440.00"));
    assert_eq!(booking.status, BookingStatus::Pending);
    assert!(!booking.is_paid);

    // One unit now remains over the window.
    let report = engine
        .check_availability(RoomType::Suite, &window)
        .await
        .unwrap();
    assert_eq!(report.free_count, 1);

    // The guest fixes a typo in the contact details.
    engine
        .update_booking(
            Some(&guest),
            booking_id,
            BookingPatch {
                customer_phone: Some("5550199".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    // Front desk confirms the payment.
    engine.confirm_payment(Some(&admin), booking_id).await.unwrap();
    let booking = engine.get_booking(Some(&guest), booking_id).await.unwrap();
    assert!(booking.is_paid);
    assert_eq!(booking.status, BookingStatus::Confirmed);
    assert_eq!(booking.customer_phone, "5550199");

    // The guest's own listing shows exactly this booking.
    let page = engine
        .list_bookings(Some(&guest), &BookingQuery::default())
        .await
        .unwrap();
    assert_eq!(page.total_count, 1);
    assert!(page.is_last_page);
    assert_eq!(page.items[0].id, booking_id);

    // Plans change: soft cancel keeps the record as a terminal tombstone.
    engine
        .cancel_booking(Some(&guest), booking_id, false)
        .await
        .unwrap();
    let booking = engine.get_booking(Some(&guest), booking_id).await.unwrap();
    assert_eq!(booking.status, BookingStatus::Cancelled);
    let err = engine
        .update_booking(Some(&guest), booking_id, BookingPatch::default())
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::ImmutableState(_)));

    // Back office purges the record for good.
    engine
        .cancel_booking(Some(&admin), booking_id, true)
        .await
        .unwrap();
    let err = engine
        .get_booking(Some(&admin), booking_id)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        EngineError::NotFound {
            entity: "booking",
            ..
        }
    ));
}

#[tokio::test]
async fn concurrent_requests_cannot_oversell_the_last_unit() {
    let engine = Arc::new(engine());
    let admin = Caller::new("admin-1", UserRole::Admin);
    engine
        .create_room(
            Some(&admin),
            RoomDraft {
                room_type: RoomType::Penthouse,
                name: "Skyline".into(),
                description: None,
                capacity: 2,
                total_rooms: 1,
                price_per_night: dec("900"),
                amenities: vec!["terrace".into()],
                available: true,
            },
        )
        .await
        .unwrap();

    let mut handles = Vec::new();
    for i in 0..8 {
        let engine = Arc::clone(&engine);
        handles.push(tokio::spawn(async move {
            let caller = Caller::new(format!("u{i}"), UserRole::User);
            engine
                .create_booking(
                    Some(&caller),
                    BookingDraft {
                        customer_first_name: "Ada".into(),
                        customer_last_name: "Lovelace".into(),
                        customer_email: "ada@example.com".into(),
                        customer_phone: "5551234".into(),
                        room_type: RoomType::Penthouse,
                        guests: 1,
                        check_in: d("2024-03-01"),
                        check_out: d("2024-03-04"),
                        notes: None,
                        payment_method: PaymentMethod::Cash,
                    },
                )
                .await
        }));
    }

    let mut won = 0;
    let mut unavailable = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => won += 1,
            Err(EngineError::RoomUnavailable(RoomType::Penthouse)) => unavailable += 1,
            Err(other) => panic!("unexpected error: {other}"),
        }
    }
    assert_eq!(won, 1);
    assert_eq!(unavailable, 7);

    let report = engine
        .check_availability(
            RoomType::Penthouse,
            &StayRange::new(d("2024-03-01"), d("2024-03-04")),
        )
        .await
        .unwrap();
    assert_eq!(report.free_count, 0);
}
