//! Row shapes of the `projects` table and the mapping to and from the
//! client-side [`Project`]. The backend names the delivery date
//! `delivery_date` and derives nothing; the client adds `month`.

use serde::{Deserialize, Serialize};
use time::Date;

use crate::domain::date::iso_date_option;
use crate::domain::lenient;
use crate::domain::{month_for, Category, Project, ProjectInput, Status};

/// A row as the backend returns it.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ProjectRow {
    #[serde(deserialize_with = "lenient::id")]
    pub id: String,
    pub title: String,
    pub category: Category,
    #[serde(deserialize_with = "lenient::number")]
    pub price: f64,
    #[serde(deserialize_with = "lenient::number")]
    pub hours: f64,
    #[serde(default, deserialize_with = "iso_date_option::deserialize")]
    pub delivery_date: Option<Date>,
    pub status: Status,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// The persisted field set sent on insert and full update.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewProjectRow {
    pub title: String,
    pub category: Category,
    pub price: f64,
    pub hours: f64,
    #[serde(with = "iso_date_option")]
    pub delivery_date: Option<Date>,
    pub status: Status,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct StatusPatch {
    pub status: Status,
}

pub fn project_from_row(row: ProjectRow) -> Project {
    Project {
        month: month_for(row.delivery_date),
        id: row.id,
        title: row.title,
        category: row.category,
        price: row.price,
        hours: row.hours,
        delivery_date: row.delivery_date,
        status: row.status,
    }
}

pub fn row_from_input(input: &ProjectInput) -> NewProjectRow {
    NewProjectRow {
        title: input.title.clone(),
        category: input.category,
        price: input.price,
        hours: input.hours,
        delivery_date: input.delivery_date,
        status: input.status,
    }
}
