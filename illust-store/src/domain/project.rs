use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};
use time::Date;

use super::date::{self, iso_date_option};
use super::lenient;
use crate::error::ValidationError;

/// Kind of illustration work. Serialized with the labels the backend table and
/// saved local data already use.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[strum(ascii_case_insensitive)]
pub enum Category {
    #[serde(rename = "キャラデザ", alias = "character-design")]
    #[strum(to_string = "キャラデザ", serialize = "character-design")]
    CharacterDesign,
    #[serde(rename = "立ち絵", alias = "standing-illustration")]
    #[strum(to_string = "立ち絵", serialize = "standing-illustration")]
    StandingIllustration,
    #[serde(rename = "背景", alias = "background")]
    #[strum(to_string = "背景", serialize = "background")]
    Background,
    #[serde(rename = "ロゴ・アイコン", alias = "logo-icon")]
    #[strum(to_string = "ロゴ・アイコン", serialize = "logo-icon")]
    LogoIcon,
    #[serde(rename = "Live2D", alias = "live2d")]
    #[strum(to_string = "Live2D", serialize = "live2d")]
    Live2d,
    #[serde(rename = "その他", alias = "other")]
    #[strum(to_string = "その他", serialize = "other")]
    Other,
}

impl Category {
    pub fn slug(&self) -> &'static str {
        match self {
            Category::CharacterDesign => "character-design",
            Category::StandingIllustration => "standing-illustration",
            Category::Background => "background",
            Category::LogoIcon => "logo-icon",
            Category::Live2d => "live2d",
            Category::Other => "other",
        }
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[strum(ascii_case_insensitive)]
pub enum Status {
    #[serde(rename = "制作中", alias = "in-progress")]
    #[strum(to_string = "制作中", serialize = "in-progress")]
    InProgress,
    #[serde(rename = "チェック待ち", alias = "awaiting-check")]
    #[strum(to_string = "チェック待ち", serialize = "awaiting-check")]
    AwaitingCheck,
    #[serde(rename = "納品済み", alias = "delivered")]
    #[strum(to_string = "納品済み", serialize = "delivered")]
    Delivered,
}

impl Status {
    pub fn slug(&self) -> &'static str {
        match self {
            Status::InProgress => "in-progress",
            Status::AwaitingCheck => "awaiting-check",
            Status::Delivered => "delivered",
        }
    }
}

/// A commissioned project as held by the store and saved to local storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    #[serde(deserialize_with = "lenient::id")]
    pub id: String,
    pub title: String,
    pub category: Category,
    #[serde(deserialize_with = "lenient::number")]
    pub price: f64,
    #[serde(deserialize_with = "lenient::number")]
    pub hours: f64,
    #[serde(default, with = "iso_date_option")]
    pub delivery_date: Option<Date>,
    pub status: Status,
    /// `YYYY-MM` aggregation key. Always derived from `delivery_date`.
    #[serde(default)]
    pub month: String,
}

impl Project {
    /// The editable fields of this project, e.g. to prefill an edit.
    pub fn input(&self) -> ProjectInput {
        ProjectInput {
            title: self.title.clone(),
            category: self.category,
            price: self.price,
            hours: self.hours,
            delivery_date: self.delivery_date,
            status: self.status,
        }
    }

    pub fn delivery_date_iso(&self) -> String {
        self.delivery_date.map(date::format_iso).unwrap_or_default()
    }
}

/// Everything a caller supplies when creating or replacing a project.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectInput {
    pub title: String,
    pub category: Category,
    pub price: f64,
    pub hours: f64,
    pub delivery_date: Option<Date>,
    pub status: Status,
}

impl ProjectInput {
    /// Required-field and range checks run by the front end before it calls
    /// into the store.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::new("title", "must not be empty"));
        }
        if !self.price.is_finite() || self.price < 0.0 {
            return Err(ValidationError::new("price", "must be a non-negative number"));
        }
        if !self.hours.is_finite() || self.hours < 0.0 {
            return Err(ValidationError::new("hours", "must be a non-negative number"));
        }
        if (self.hours * 2.0).fract() != 0.0 {
            return Err(ValidationError::new("hours", "must be a multiple of 0.5"));
        }
        Ok(())
    }

    pub(crate) fn into_project(self, id: String) -> Project {
        let month = month_for(self.delivery_date);
        Project {
            id,
            title: self.title,
            category: self.category,
            price: self.price,
            hours: self.hours,
            delivery_date: self.delivery_date,
            status: self.status,
            month,
        }
    }
}

/// The `YYYY-MM` key of a delivery date, or of the current month when the
/// date is absent.
pub fn month_for(delivery_date: Option<Date>) -> String {
    month_key(delivery_date.unwrap_or_else(date::today))
}

pub fn month_key(date: Date) -> String {
    date.format(date::MONTH_KEY).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use strum::IntoEnumIterator;
    use time::macros::date;

    fn input() -> ProjectInput {
        ProjectInput {
            title: "VTuber character sheet".to_string(),
            category: Category::CharacterDesign,
            price: 30000.0,
            hours: 12.5,
            delivery_date: Some(date!(2024 - 05 - 20)),
            status: Status::InProgress,
        }
    }

    #[test]
    fn month_is_prefix_of_delivery_date() {
        for d in [date!(2024 - 01 - 01), date!(2023 - 12 - 31), date!(2025 - 10 - 09)] {
            assert_eq!(month_for(Some(d)), date::format_iso(d)[..7]);
        }
    }

    #[test]
    fn month_defaults_to_current_month() {
        let expected = month_key(date::today());
        assert_eq!(month_for(None), expected);
    }

    #[test]
    fn into_project_derives_month() {
        let project = input().into_project("p1".to_string());
        assert_eq!(project.month, "2024-05");
        assert_eq!(project.id, "p1");
        assert_eq!(project.input(), input());
    }

    #[test]
    fn validate_rejects_blank_title() {
        let mut bad = input();
        bad.title = "   ".to_string();
        assert_eq!(bad.validate().unwrap_err().field, "title");
    }

    #[test]
    fn validate_rejects_negative_and_fractional_hours() {
        let mut bad = input();
        bad.price = -1.0;
        assert_eq!(bad.validate().unwrap_err().field, "price");

        let mut bad = input();
        bad.hours = 1.25;
        assert_eq!(bad.validate().unwrap_err().field, "hours");

        assert!(input().validate().is_ok());
    }

    #[test]
    fn enums_parse_slugs_and_labels() {
        assert_eq!(Category::from_str("live2d").unwrap(), Category::Live2d);
        assert_eq!(Category::from_str("LIVE2D").unwrap(), Category::Live2d);
        assert_eq!(Category::from_str("背景").unwrap(), Category::Background);
        assert_eq!(Status::from_str("awaiting-check").unwrap(), Status::AwaitingCheck);
        assert!(Status::from_str("cancelled").is_err());

        for category in Category::iter() {
            assert_eq!(Category::from_str(category.slug()).unwrap(), category);
        }
    }

    #[test]
    fn serializes_with_client_field_names() {
        let project = input().into_project("p1".to_string());
        let json = serde_json::to_value(&project).unwrap();
        assert_eq!(json["deliveryDate"], "2024-05-20");
        assert_eq!(json["category"], "キャラデザ");
        assert_eq!(json["status"], "制作中");
        assert_eq!(json["month"], "2024-05");
    }

    #[test]
    fn reads_records_saved_with_string_numbers() {
        let raw = r#"{
            "id": "k3j9x0a1b",
            "title": "Logo",
            "category": "ロゴ・アイコン",
            "price": "8000",
            "hours": "3.5",
            "deliveryDate": "2024-02-14",
            "status": "納品済み",
            "month": "2024-02"
        }"#;
        let project: Project = serde_json::from_str(raw).unwrap();
        assert_eq!(project.price, 8000.0);
        assert_eq!(project.hours, 3.5);
        assert_eq!(project.category, Category::LogoIcon);
        assert_eq!(project.status, Status::Delivered);
    }
}
