use strum::{Display, EnumString};

use crate::domain::{Project, Status};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum SortKey {
    /// Collection order, newest created first.
    #[default]
    Created,
    /// Most expensive first.
    Price,
    /// Earliest delivery first; undated projects lead.
    #[strum(to_string = "delivery", serialize = "delivery-date")]
    DeliveryDate,
}

/// Filter and ordering for the project list.
#[derive(Debug, Clone, Default)]
pub struct ListQuery {
    pub status: Option<Status>,
    /// Case-insensitive title substring; empty matches everything.
    pub search: String,
    pub sort: SortKey,
}

impl ListQuery {
    pub fn apply<'a>(&self, projects: &'a [Project]) -> Vec<&'a Project> {
        let needle = self.search.trim().to_lowercase();
        let mut matched: Vec<&Project> = projects
            .iter()
            .filter(|p| self.status.map_or(true, |status| p.status == status))
            .filter(|p| needle.is_empty() || p.title.to_lowercase().contains(&needle))
            .collect();

        match self.sort {
            SortKey::Created => {}
            SortKey::Price => matched.sort_by(|a, b| b.price.total_cmp(&a.price)),
            SortKey::DeliveryDate => matched.sort_by_key(|p| p.delivery_date),
        }
        matched
    }
}

/// Up to `limit` distinct titles in collection order, for input suggestions.
pub fn recent_titles(projects: &[Project], limit: usize) -> Vec<&str> {
    let mut titles: Vec<&str> = Vec::with_capacity(limit);
    for project in projects {
        if titles.len() == limit {
            break;
        }
        if !titles.contains(&project.title.as_str()) {
            titles.push(&project.title);
        }
    }
    titles
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Category;
    use std::str::FromStr;
    use time::macros::date;
    use time::Date;

    fn project(title: &str, price: f64, delivery: Option<Date>, status: Status) -> Project {
        Project {
            id: title.to_string(),
            title: title.to_string(),
            category: Category::Other,
            price,
            hours: 1.0,
            delivery_date: delivery,
            status,
            month: String::new(),
        }
    }

    fn sample() -> Vec<Project> {
        vec![
            project("Mascot", 3000.0, Some(date!(2024 - 05 - 01)), Status::InProgress),
            project("Banner", 9000.0, Some(date!(2024 - 03 - 15)), Status::Delivered),
            project("mascot v2", 5000.0, None, Status::AwaitingCheck),
            project("Icon", 9000.0, Some(date!(2024 - 04 - 20)), Status::InProgress),
        ]
    }

    fn titles(projects: Vec<&Project>) -> Vec<&str> {
        projects.into_iter().map(|p| p.title.as_str()).collect()
    }

    #[test]
    fn default_query_keeps_everything_in_order() {
        let projects = sample();
        assert_eq!(
            titles(ListQuery::default().apply(&projects)),
            vec!["Mascot", "Banner", "mascot v2", "Icon"]
        );
    }

    #[test]
    fn status_filter_only_returns_matching() {
        let projects = sample();
        let query = ListQuery {
            status: Some(Status::InProgress),
            ..Default::default()
        };
        let matched = query.apply(&projects);
        assert_eq!(matched.len(), 2);
        assert!(matched.iter().all(|p| p.status == Status::InProgress));
    }

    #[test]
    fn search_is_case_insensitive() {
        let projects = sample();
        let query = ListQuery {
            search: "MASCOT".to_string(),
            ..Default::default()
        };
        assert_eq!(titles(query.apply(&projects)), vec!["Mascot", "mascot v2"]);
    }

    #[test]
    fn price_sort_is_non_increasing_and_stable() {
        let projects = sample();
        let query = ListQuery {
            sort: SortKey::Price,
            ..Default::default()
        };
        let sorted = query.apply(&projects);
        assert!(sorted.windows(2).all(|w| w[0].price >= w[1].price));
        assert_eq!(titles(sorted), vec!["Banner", "Icon", "mascot v2", "Mascot"]);
    }

    #[test]
    fn delivery_sort_is_non_decreasing_with_undated_first() {
        let projects = sample();
        let query = ListQuery {
            sort: SortKey::DeliveryDate,
            ..Default::default()
        };
        let sorted = query.apply(&projects);
        let dates: Vec<String> = sorted.iter().map(|p| p.delivery_date_iso()).collect();
        assert!(dates.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(dates[0], "");
    }

    #[test]
    fn sort_keys_parse_from_cli_names() {
        assert_eq!(SortKey::from_str("price").unwrap(), SortKey::Price);
        assert_eq!(SortKey::from_str("delivery").unwrap(), SortKey::DeliveryDate);
        assert_eq!(SortKey::from_str("Created").unwrap(), SortKey::Created);
    }

    #[test]
    fn recent_titles_are_distinct_and_limited() {
        let projects = vec![
            project("a", 1.0, None, Status::InProgress),
            project("b", 1.0, None, Status::InProgress),
            project("a", 1.0, None, Status::InProgress),
            project("c", 1.0, None, Status::InProgress),
        ];
        assert_eq!(recent_titles(&projects, 2), vec!["a", "b"]);
        assert_eq!(recent_titles(&projects, 5), vec!["a", "b", "c"]);
        assert!(recent_titles(&[], 5).is_empty());
    }
}
