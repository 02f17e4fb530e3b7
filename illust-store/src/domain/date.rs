use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::{Date, OffsetDateTime};

pub(crate) const ISO_DATE: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day]");
pub(crate) const MONTH_KEY: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]");
pub(crate) const COMPACT_DATE: &[BorrowedFormatItem<'static>] =
    format_description!("[year][month][day]");

/// Today's date in the local offset, falling back to UTC when the offset
/// cannot be determined.
pub fn today() -> Date {
    OffsetDateTime::now_local()
        .unwrap_or_else(|_| OffsetDateTime::now_utc())
        .date()
}

pub fn format_iso(date: Date) -> String {
    date.format(ISO_DATE).unwrap_or_default()
}

pub fn parse_iso(raw: &str) -> Result<Date, time::error::Parse> {
    let raw = raw.trim();
    // Timestamps ("2024-05-01T00:00:00+00:00") carry the date in their first 10 bytes.
    let raw = raw.get(..10).unwrap_or(raw);
    Date::parse(raw, ISO_DATE)
}

/// Serde adapter for `Option<Date>` stored as `YYYY-MM-DD`. Null, missing and
/// empty strings all read back as `None`.
pub mod iso_date_option {
    use serde::{de, Deserialize, Deserializer, Serializer};
    use time::Date;

    pub fn serialize<S: Serializer>(date: &Option<Date>, serializer: S) -> Result<S::Ok, S::Error> {
        match date {
            Some(date) => serializer.serialize_some(&super::format_iso(*date)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Date>, D::Error> {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        match raw.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(raw) => super::parse_iso(raw).map(Some).map_err(de::Error::custom),
        }
    }
}
