use time::macros::format_description;
use time::Date;

use crate::ValidationError;

/// Parse a strict `YYYY-MM-DD` calendar date.
///
/// Exactly four year digits, zero-padded month and day, no sign and no
/// surrounding text. The date must exist in the calendar.
pub fn parse_iso_date(input: &str) -> Result<Date, ValidationError> {
    let invalid = || ValidationError::InvalidCalendarDate {
        value: input.to_owned(),
    };

    if !has_iso_date_shape(input) {
        return Err(invalid());
    }

    let format = format_description!("[year]-[month]-[day]");
    Date::parse(input, format).map_err(|_| invalid())
}

fn has_iso_date_shape(input: &str) -> bool {
    let bytes = input.as_bytes();
    bytes.len() == 10
        && bytes.iter().enumerate().all(|(index, byte)| match index {
            4 | 7 => *byte == b'-',
            _ => byte.is_ascii_digit(),
        })
}
