use rust_decimal::{Decimal, RoundingStrategy};

use crate::model::StayRange;

use super::EngineError;

/// Surcharge applied to the base price per guest beyond the first, in
/// hundredths (10 == 10%).
const EXTRA_GUEST_RATE_CENTS: i64 = 10;

/// Price a stay: nightly rate times billed nights, plus 10% of the base per
/// extra guest, rounded to 2 decimal places half-up. Pure and deterministic.
pub fn quote_stay(
    price_per_night: Decimal,
    range: &StayRange,
    guests: u32,
) -> Result<Decimal, EngineError> {
    let nights = range.nights();
    if nights <= 0 {
        return Err(EngineError::field(
            "check_out",
            "check-out must fall after check-in",
        ));
    }

    // Checked throughout: an extreme nightly rate must surface as an input
    // error, not a panic inside the decimal arithmetic.
    let base = price_per_night
        .checked_mul(Decimal::from(nights))
        .ok_or_else(price_overflow)?;
    let surcharge = if guests > 1 {
        base.checked_mul(Decimal::new(EXTRA_GUEST_RATE_CENTS, 2))
            .and_then(|rate| rate.checked_mul(Decimal::from(guests - 1)))
            .ok_or_else(price_overflow)?
    } else {
        Decimal::ZERO
    };
    let total = base.checked_add(surcharge).ok_or_else(price_overflow)?;

    Ok(total.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero))
}

fn price_overflow() -> EngineError {
    EngineError::field(
        "price_per_night",
        "stay total exceeds the representable price range",
    )
}
