use std::time::Duration;

// JWT configuration
pub const JWT_TOKEN_EXPIRY: Duration = Duration::from_secs(7 * 24 * 60 * 60); // 7 days
pub const JWT_MIN_SECRET_LEN: usize = 32;

// Pagination defaults
pub const DEFAULT_PAGE_SIZE: i64 = 50;
pub const MAX_PAGE_SIZE: i64 = 200;
pub const DEFAULT_ACTIVITY_LOG_LIMIT: i64 = 100;

// Booking lifecycle
pub const BOOKING_LOCK_HOURS: i64 = 24;
pub const DEFAULT_PAYMENT_METHOD: &str = "cash";

// Inventory pricing: batch tickets are listed at buying price plus a fixed
// markup, floored to a whole amount.
pub const DEFAULT_MARKUP_PERCENT: i64 = 20;

pub fn default_selling_price(buying_price: i64) -> i64 {
    buying_price * (100 + DEFAULT_MARKUP_PERCENT) / 100
}

// System settings: keys the API accepts for writes, and the subset exposed
// to callers without the system-settings permission.
pub const ALLOWED_SETTING_KEYS: &[&str] = &[
    "company_name",
    "company_email",
    "company_phone",
    "company_address",
    "default_currency",
    "timezone",
    "language",
    "auto_backup",
    "email_notifications",
    "sms_notifications",
    "booking_timeout",
];

pub const PUBLIC_SETTING_KEYS: &[&str] = &[
    "company_name",
    "company_email",
    "company_phone",
    "company_address",
    "default_currency",
    "timezone",
    "language",
];

// Keys readable by any authenticated user through GET /api/settings/{key}.
pub const OPEN_SETTING_KEYS: &[&str] = &[
    "company_name",
    "default_currency",
    "timezone",
    "language",
    "booking_timeout",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn markup_floors_to_whole_amounts() {
        assert_eq!(default_selling_price(18_000), 21_600);
        assert_eq!(default_selling_price(38_000), 45_600);
        assert_eq!(default_selling_price(44_000), 52_800);
        // 99 * 1.2 = 118.8, floored
        assert_eq!(default_selling_price(99), 118);
    }

    #[test]
    fn public_keys_are_a_subset_of_allowed_keys() {
        for key in PUBLIC_SETTING_KEYS {
            assert!(ALLOWED_SETTING_KEYS.contains(key));
        }
        for key in OPEN_SETTING_KEYS {
            assert!(ALLOWED_SETTING_KEYS.contains(key));
        }
    }
}
