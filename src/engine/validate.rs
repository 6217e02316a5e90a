//! Domain validation for engine inputs.
//!
//! Payload shape checking happens before the engine is invoked; what lives
//! here are the domain rules (required fields, ranges, date ordering, filter
//! pairing), all reported as itemized field errors.

use chrono::{DateTime, Utc};
use validator::Validate;

use crate::config::EngineConfig;
use crate::limits::MAX_STAY_NIGHTS;
use crate::model::{BookingDraft, BookingPatch, BookingQuery, RoomDraft, RoomPatch, RoomQuery, StayRange};

use super::error::{EngineError, FieldError, fields_of};

pub(super) fn room_draft(draft: &RoomDraft) -> Result<(), EngineError> {
    draft.validate().map_err(EngineError::from)
}

pub(super) fn room_patch(patch: &RoomPatch) -> Result<(), EngineError> {
    patch.validate().map_err(EngineError::from)
}

/// Field rules plus date ordering; returns the stay window on success.
pub(super) fn booking_draft(draft: &BookingDraft) -> Result<StayRange, EngineError> {
    let mut fields = match draft.validate() {
        Ok(()) => Vec::new(),
        Err(errors) => fields_of(errors),
    };

    let range = draft.stay();
    let nights = range.nights();
    if nights <= 0 {
        fields.push(FieldError::new(
            "check_out",
            "check-out must fall after check-in",
        ));
    } else if nights > MAX_STAY_NIGHTS {
        fields.push(FieldError::new(
            "check_out",
            format!("stay cannot exceed {MAX_STAY_NIGHTS} nights"),
        ));
    }

    if fields.is_empty() {
        Ok(range)
    } else {
        Err(EngineError::Validation(fields))
    }
}

pub(super) fn booking_patch(patch: &BookingPatch) -> Result<(), EngineError> {
    patch.validate().map_err(EngineError::from)
}

/// Resolve page size and overlap window for a booking listing.
pub(super) fn booking_query(
    query: &BookingQuery,
    config: &EngineConfig,
) -> Result<(usize, Option<StayRange>), EngineError> {
    let mut fields = Vec::new();

    let page_size = match query.page_size {
        None => config.default_page_size,
        Some(0) => {
            fields.push(FieldError::new("page_size", "page size must be positive"));
            config.default_page_size
        }
        Some(n) if n > config.max_page_size => {
            fields.push(FieldError::new(
                "page_size",
                format!("page size cannot exceed {}", config.max_page_size),
            ));
            config.default_page_size
        }
        Some(n) => n,
    };

    let window = date_window(query.check_in, query.check_out, &mut fields);

    if fields.is_empty() {
        Ok((page_size, window))
    } else {
        Err(EngineError::Validation(fields))
    }
}

/// Resolve overlap window and guest floor for a room listing.
pub(super) fn room_query(
    query: &RoomQuery,
) -> Result<(Option<StayRange>, Option<u32>), EngineError> {
    let mut fields = Vec::new();

    if query.guests == Some(0) {
        fields.push(FieldError::new("guests", "at least one guest is required"));
    }

    let window = date_window(query.check_in, query.check_out, &mut fields);

    if fields.is_empty() {
        Ok((window, query.guests))
    } else {
        Err(EngineError::Validation(fields))
    }
}

/// Date filters come in pairs: both bounds with check-out after check-in,
/// or neither.
fn date_window(
    check_in: Option<DateTime<Utc>>,
    check_out: Option<DateTime<Utc>>,
    fields: &mut Vec<FieldError>,
) -> Option<StayRange> {
    match (check_in, check_out) {
        (Some(check_in), Some(check_out)) => {
            if check_out > check_in {
                Some(StayRange::new(check_in, check_out))
            } else {
                fields.push(FieldError::new(
                    "check_out",
                    "check-out must fall after check-in",
                ));
                None
            }
        }
        (None, None) => None,
        _ => {
            fields.push(FieldError::new(
                "check_in",
                "check-in and check-out filters must be supplied together",
            ));
            None
        }
    }
}
