//! Date helpers for RFC 3339 timestamps and `YYYY-MM` month strings.

use time::{Month, OffsetDateTime, format_description::well_known::Rfc3339, util};

/// The current UTC time as an RFC 3339 string, used for record timestamps.
pub fn now_rfc3339() -> String {
    // The well-known format cannot fail for a UTC datetime.
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_default()
}

/// The current UTC month as a `YYYY-MM` string.
pub fn current_month() -> String {
    let now = OffsetDateTime::now_utc();

    format!("{:04}-{:02}", now.year(), now.month() as u8)
}

/// Whether `text` parses as an RFC 3339 datetime.
pub fn is_valid_datetime(text: &str) -> bool {
    OffsetDateTime::parse(text, &Rfc3339).is_ok()
}

/// Parse a `YYYY-MM` month string into a year and month.
pub fn parse_month(month: &str) -> Option<(i32, Month)> {
    let (year_text, month_text) = month.split_once('-')?;

    if year_text.len() != 4 || month_text.len() != 2 {
        return None;
    }

    let year: i32 = year_text.parse().ok()?;
    let month_number: u8 = month_text.parse().ok()?;
    let month = Month::try_from(month_number).ok()?;

    Some((year, month))
}

/// The first instant of `month` as an RFC 3339 string.
///
/// Returns `None` if `month` is not a valid `YYYY-MM` string.
pub fn month_start(month: &str) -> Option<String> {
    parse_month(month)?;

    Some(format!("{month}-01T00:00:00.000Z"))
}

/// The last instant of `month` as an RFC 3339 string.
///
/// Returns `None` if `month` is not a valid `YYYY-MM` string.
pub fn month_end(month: &str) -> Option<String> {
    let (year, parsed_month) = parse_month(month)?;
    let last_day = util::days_in_year_month(year, parsed_month);

    Some(format!("{month}-{last_day:02}T23:59:59.999Z"))
}
