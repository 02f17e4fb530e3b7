use std::collections::BTreeMap;

use crate::domain::{month_key, Category, Project, Status};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Summary {
    pub total_revenue: f64,
    pub total_hours: f64,
    /// Revenue per hour, rounded. Zero when no hours are recorded.
    pub average_hourly_rate: f64,
    pub delivered_count: usize,
}

pub fn summary(projects: &[Project]) -> Summary {
    let total_revenue: f64 = projects.iter().map(|p| p.price).sum();
    let total_hours: f64 = projects.iter().map(|p| p.hours).sum();
    let average_hourly_rate = if total_hours > 0.0 {
        (total_revenue / total_hours).round()
    } else {
        0.0
    };

    Summary {
        total_revenue,
        total_hours,
        average_hourly_rate,
        delivered_count: projects
            .iter()
            .filter(|p| p.status == Status::Delivered)
            .count(),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MonthlyRevenue {
    /// `YYYY-MM`
    pub month: String,
    pub revenue: f64,
    pub count: usize,
    pub average_price: f64,
}

/// Revenue per month, oldest first, keeping only the most recent `limit`
/// months.
pub fn monthly_revenue(projects: &[Project], limit: usize) -> Vec<MonthlyRevenue> {
    let mut months: BTreeMap<String, (f64, usize)> = BTreeMap::new();
    for project in projects {
        let month = if project.month.is_empty() {
            match project.delivery_date {
                Some(d) => month_key(d),
                None => continue,
            }
        } else {
            project.month.clone()
        };
        let entry = months.entry(month).or_default();
        entry.0 += project.price;
        entry.1 += 1;
    }

    let skip = months.len().saturating_sub(limit);
    months
        .into_iter()
        .skip(skip)
        .map(|(month, (revenue, count))| MonthlyRevenue {
            month,
            revenue,
            count,
            average_price: (revenue / count as f64).round(),
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryRevenue {
    pub category: Category,
    pub revenue: f64,
}

/// Revenue per category in the order categories first appear.
pub fn category_revenue(projects: &[Project]) -> Vec<CategoryRevenue> {
    let mut totals: Vec<CategoryRevenue> = Vec::new();
    for project in projects {
        match totals.iter_mut().find(|t| t.category == project.category) {
            Some(total) => total.revenue += project.price,
            None => totals.push(CategoryRevenue {
                category: project.category,
                revenue: project.price,
            }),
        }
    }
    totals
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    fn project(category: Category, price: f64, hours: f64, month: &str, status: Status) -> Project {
        Project {
            id: format!("{category:?}-{price}-{month}"),
            title: "t".to_string(),
            category,
            price,
            hours,
            delivery_date: None,
            status,
            month: month.to_string(),
        }
    }

    #[test]
    fn empty_input_reports_zero_state() {
        assert_eq!(summary(&[]), Summary::default());
        assert!(monthly_revenue(&[], 6).is_empty());
        assert!(category_revenue(&[]).is_empty());
    }

    #[test]
    fn summary_totals_and_rounded_rate() {
        let projects = [
            project(Category::Other, 10000.0, 3.0, "2024-01", Status::Delivered),
            project(Category::Other, 5000.0, 3.5, "2024-01", Status::InProgress),
        ];
        let s = summary(&projects);
        assert_eq!(s.total_revenue, 15000.0);
        assert_eq!(s.total_hours, 6.5);
        assert_eq!(s.average_hourly_rate, 2308.0);
        assert_eq!(s.delivered_count, 1);
    }

    #[test]
    fn rate_is_zero_without_hours() {
        let projects = [project(Category::Other, 1000.0, 0.0, "2024-01", Status::InProgress)];
        assert_eq!(summary(&projects).average_hourly_rate, 0.0);
    }

    #[test]
    fn category_totals_sum_prices() {
        let projects = [
            project(Category::Background, 1000.0, 1.0, "2024-01", Status::InProgress),
            project(Category::Background, 2000.0, 1.0, "2024-02", Status::InProgress),
            project(Category::Background, 1500.0, 1.0, "2024-03", Status::InProgress),
        ];
        assert_eq!(
            category_revenue(&projects),
            vec![CategoryRevenue {
                category: Category::Background,
                revenue: 4500.0
            }]
        );
    }

    #[test]
    fn categories_keep_first_seen_order() {
        let projects = [
            project(Category::Live2d, 1.0, 1.0, "2024-01", Status::InProgress),
            project(Category::LogoIcon, 1.0, 1.0, "2024-01", Status::InProgress),
            project(Category::Live2d, 1.0, 1.0, "2024-01", Status::InProgress),
        ];
        let order: Vec<_> = category_revenue(&projects)
            .into_iter()
            .map(|c| c.category)
            .collect();
        assert_eq!(order, vec![Category::Live2d, Category::LogoIcon]);
    }

    #[test]
    fn monthly_keeps_latest_months_in_ascending_order() {
        let projects: Vec<_> = (1..=8)
            .map(|m| project(Category::Other, 1000.0 * m as f64, 1.0, &format!("2024-{m:02}"), Status::Delivered))
            .chain([project(Category::Other, 3000.0, 1.0, "2024-08", Status::Delivered)])
            .collect();

        let monthly = monthly_revenue(&projects, 6);

        let months: Vec<_> = monthly.iter().map(|m| m.month.as_str()).collect();
        assert_eq!(months, vec!["2024-03", "2024-04", "2024-05", "2024-06", "2024-07", "2024-08"]);
        let august = monthly.last().unwrap();
        assert_eq!(august.revenue, 11000.0);
        assert_eq!(august.count, 2);
        assert_eq!(august.average_price, 5500.0);
    }

    #[test]
    fn monthly_falls_back_to_delivery_date() {
        let mut p = project(Category::Other, 100.0, 1.0, "", Status::Delivered);
        p.delivery_date = Some(date!(2023 - 12 - 24));
        let undated = project(Category::Other, 100.0, 1.0, "", Status::Delivered);

        let monthly = monthly_revenue(&[p, undated], 6);
        assert_eq!(monthly.len(), 1);
        assert_eq!(monthly[0].month, "2023-12");
    }
}
