//! # Value Formatters
//!
//! Deterministic normalization of the values that enter signed payloads:
//! monetary amounts and expiration timestamps. Both shapes are part of the
//! wire contract, so they are produced here and nowhere else.

use binga_core::{BingaError, BingaResult};
use chrono::{DateTime, Duration, Utc};
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use std::fmt::Write as _;

/// Expiration timestamp shape the gateway expects: ISO-style date/time
/// with a literal `T` separator, suffixed with the fixed GMT zone name.
pub const DEFAULT_EXPIRATION_FORMAT: &str = "%Y-%m-%dT%H:%M:%SGMT";

/// Days an order stays payable when the caller gives no (or a non-positive)
/// expiration window.
pub const DEFAULT_EXPIRE_DAYS: i64 = 7;

/// Render an amount as a fixed-point decimal string with exactly two
/// fraction digits, rounding half away from zero.
///
/// Uses decimal arithmetic so monetary values never pick up binary-float
/// representation error (`19.999` becomes `"20.00"`, not
/// `"19.999999..."`). Non-finite input is a fatal error.
pub fn format_amount(amount: f64) -> BingaResult<String> {
    let decimal = Decimal::from_f64(amount).ok_or_else(|| {
        BingaError::Configuration(format!("amount '{amount}' is not a finite number"))
    })?;

    let mut rounded =
        decimal.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);

    Ok(rounded.to_string())
}

/// Render the expiration timestamp for a charge submitted now.
///
/// `expire_days <= 0` is substituted with [`DEFAULT_EXPIRE_DAYS`]. The
/// result is computed in GMT and rendered with
/// [`DEFAULT_EXPIRATION_FORMAT`]; callers depend on this exact textual
/// shape for signing and transmission.
pub fn format_expiration_date(expire_days: i64) -> BingaResult<String> {
    expiration_from(Utc::now(), expire_days, DEFAULT_EXPIRATION_FORMAT)
}

/// Same as [`format_expiration_date`] with an explicit `strftime`-style
/// format string.
pub fn format_expiration_date_with(expire_days: i64, format: &str) -> BingaResult<String> {
    expiration_from(Utc::now(), expire_days, format)
}

fn expiration_from(now: DateTime<Utc>, expire_days: i64, format: &str) -> BingaResult<String> {
    let days = if expire_days > 0 {
        expire_days
    } else {
        DEFAULT_EXPIRE_DAYS
    };

    let window = Duration::try_days(days).ok_or_else(|| {
        BingaError::Configuration(format!("expiration window of {days} days is out of range"))
    })?;
    let expires_at = now.checked_add_signed(window).ok_or_else(|| {
        BingaError::Configuration(format!("expiration window of {days} days is out of range"))
    })?;

    // A bad format specifier surfaces as a formatting failure, which must
    // be fatal rather than an omitted field.
    let mut rendered = String::new();
    write!(rendered, "{}", expires_at.format(format)).map_err(|_| {
        BingaError::Configuration(format!("invalid expiration date format '{format}'"))
    })?;

    Ok(rendered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_format_amount_two_fraction_digits() {
        assert_eq!(format_amount(19.999).unwrap(), "20.00");
        assert_eq!(format_amount(100.0).unwrap(), "100.00");
        assert_eq!(format_amount(0.005).unwrap(), "0.01");
        assert_eq!(format_amount(-1.005).unwrap(), "-1.01");
        assert_eq!(format_amount(7.0).unwrap(), "7.00");
    }

    #[test]
    fn test_format_amount_idempotent() {
        let formatted = format_amount(199.994).unwrap();
        assert_eq!(formatted, "199.99");

        let reparsed: f64 = formatted.parse().unwrap();
        assert_eq!(format_amount(reparsed).unwrap(), formatted);
    }

    #[test]
    fn test_format_amount_rejects_non_finite() {
        assert!(format_amount(f64::NAN).is_err());
        assert!(format_amount(f64::INFINITY).is_err());
    }

    #[test]
    fn test_expiration_shape() {
        let now = Utc.with_ymd_and_hms(2026, 8, 7, 12, 0, 0).unwrap();
        let rendered = expiration_from(now, 7, DEFAULT_EXPIRATION_FORMAT).unwrap();
        assert_eq!(rendered, "2026-08-14T12:00:00GMT");
    }

    #[test]
    fn test_expiration_clamps_non_positive_days() {
        let now = Utc.with_ymd_and_hms(2026, 8, 7, 12, 0, 0).unwrap();
        let clamped = expiration_from(now, 0, DEFAULT_EXPIRATION_FORMAT).unwrap();
        let default = expiration_from(now, 7, DEFAULT_EXPIRATION_FORMAT).unwrap();
        assert_eq!(clamped, default);

        let negative = expiration_from(now, -3, DEFAULT_EXPIRATION_FORMAT).unwrap();
        assert_eq!(negative, default);
    }

    #[test]
    fn test_invalid_format_is_fatal() {
        let now = Utc.with_ymd_and_hms(2026, 8, 7, 12, 0, 0).unwrap();
        assert!(expiration_from(now, 7, "%Q").is_err());
    }
}
