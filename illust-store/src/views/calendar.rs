use time::{Date, Duration, Month};

use crate::domain::Project;

#[derive(Debug, Clone, PartialEq)]
pub struct CalendarDay {
    pub date: Date,
    /// False for the leading and trailing days borrowed from adjacent months.
    pub in_month: bool,
    pub is_today: bool,
    pub projects: Vec<Project>,
}

/// A month grid of Sunday-to-Saturday weeks.
#[derive(Debug, Clone, PartialEq)]
pub struct CalendarMonth {
    pub year: i32,
    pub month: Month,
    pub weeks: Vec<Vec<CalendarDay>>,
}

pub fn projects_on(projects: &[Project], date: Date) -> Vec<&Project> {
    projects
        .iter()
        .filter(|p| p.delivery_date == Some(date))
        .collect()
}

pub fn calendar_month(
    projects: &[Project],
    year: i32,
    month: Month,
    today: Date,
) -> Result<CalendarMonth, time::error::ComponentRange> {
    let first = Date::from_calendar_date(year, month, 1)?;
    let next_first = match month {
        Month::December => Date::from_calendar_date(year + 1, Month::January, 1)?,
        _ => Date::from_calendar_date(year, month.next(), 1)?,
    };
    let last = next_first - Duration::days(1);

    let start = first - Duration::days(first.weekday().number_days_from_sunday() as i64);
    let end = last + Duration::days(6 - last.weekday().number_days_from_sunday() as i64);

    let mut days = Vec::new();
    let mut day = start;
    while day <= end {
        days.push(CalendarDay {
            date: day,
            in_month: day.month() == month && day.year() == year,
            is_today: day == today,
            projects: projects_on(projects, day).into_iter().cloned().collect(),
        });
        day += Duration::days(1);
    }

    let weeks = days.chunks(7).map(<[CalendarDay]>::to_vec).collect();
    Ok(CalendarMonth { year, month, weeks })
}
