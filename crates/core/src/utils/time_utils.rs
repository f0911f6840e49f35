use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;

/// Default timezone for valuation dates.
/// This is the canonical timezone used to convert UTC instants to domain
/// dates. The tracker's reference market calendar is Central European.
pub const DEFAULT_VALUATION_TZ: Tz = chrono_tz::Europe::Budapest;

/// Converts a UTC instant to a valuation date in the given timezone.
///
/// Use this whenever a "business date" has to be derived from a timestamp,
/// so every component agrees on where the day boundary falls.
pub fn valuation_date_from_utc(instant: DateTime<Utc>, tz: Tz) -> NaiveDate {
    instant.with_timezone(&tz).date_naive()
}

/// Convenience function that uses the default valuation timezone.
pub fn valuation_date_today() -> NaiveDate {
    valuation_date_from_utc(Utc::now(), DEFAULT_VALUATION_TZ)
}

/// All calendar days from `start` through `end`, inclusive.
pub fn get_days_between(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    if start > end {
        return Vec::new();
    }
    let mut days = Vec::new();
    let mut current = start;
    while current <= end {
        days.push(current);
        if let Some(next) = current.succ_opt() {
            current = next;
        } else {
            // Out of chrono's date range; cannot happen for realistic input.
            break;
        }
    }
    days
}
