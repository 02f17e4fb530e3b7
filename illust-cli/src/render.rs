use illust_store::views::{CalendarMonth, CategoryRevenue, MonthlyRevenue, Summary};
use illust_store::Project;

pub fn project_table(projects: &[&Project]) -> String {
    if projects.is_empty() {
        return "No projects.".to_string();
    }

    let mut out = format!(
        "{:<14} {:<24} {:<14} {:>10} {:>6} {:<10} {}\n",
        "ID", "TITLE", "CATEGORY", "PRICE", "HOURS", "DELIVERY", "STATUS"
    );
    for p in projects {
        out.push_str(&format!(
            "{} {} {:<14} {:>10} {:>6} {:<10} {}\n",
            cell(&p.id, 14),
            cell(&p.title, 24),
            p.category.slug(),
            yen(p.price),
            p.hours,
            p.delivery_date_iso(),
            p.status,
        ));
    }
    out
}

pub fn summary(s: &Summary) -> String {
    format!(
        "Total revenue:   {}\nTotal hours:     {}h\nHourly rate:     {}/h\nDelivered:       {}\n",
        yen(s.total_revenue),
        s.total_hours,
        yen(s.average_hourly_rate),
        s.delivered_count,
    )
}

pub fn monthly(months: &[MonthlyRevenue]) -> String {
    if months.is_empty() {
        return "No data.".to_string();
    }
    let max = months.iter().map(|m| m.revenue).fold(0.0, f64::max);
    months
        .iter()
        .map(|m| {
            format!(
                "{} {:>10} {:>3} jobs  avg {:>8}  {}\n",
                m.month,
                yen(m.revenue),
                m.count,
                yen(m.average_price),
                bar(m.revenue, max),
            )
        })
        .collect()
}

pub fn categories(totals: &[CategoryRevenue]) -> String {
    if totals.is_empty() {
        return "No data.".to_string();
    }
    let sum: f64 = totals.iter().map(|t| t.revenue).sum();
    totals
        .iter()
        .map(|t| {
            let share = if sum > 0.0 { t.revenue / sum * 100.0 } else { 0.0 };
            format!(
                "{:<22} {:>10} {:>5.1}%\n",
                t.category.slug(),
                yen(t.revenue),
                share
            )
        })
        .collect()
}

pub fn calendar(cal: &CalendarMonth) -> String {
    let mut out = format!("{} {}\n", cal.month, cal.year);
    out.push_str(" Su  Mo  Tu  We  Th  Fr  Sa\n");
    let mut due = Vec::new();
    for week in &cal.weeks {
        for day in week {
            let marker = match (day.is_today, day.projects.is_empty()) {
                (true, _) => '>',
                (false, false) => '*',
                (false, true) => ' ',
            };
            if day.in_month {
                out.push_str(&format!("{}{:>2} ", marker, day.date.day()));
                due.extend(day.projects.iter().map(|p| (day.date, p)));
            } else {
                out.push_str("    ");
            }
        }
        out.push('\n');
    }

    for (date, project) in due {
        out.push_str(&format!(
            "\n{:02}/{:02} {} [{}]",
            date.month() as u8,
            date.day(),
            project.title,
            project.status
        ));
    }
    out
}

fn yen(amount: f64) -> String {
    let rounded = amount.round() as i64;
    let digits = rounded.unsigned_abs().to_string();
    let mut grouped = String::new();
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    if rounded < 0 {
        format!("-¥{grouped}")
    } else {
        format!("¥{grouped}")
    }
}

fn bar(value: f64, max: f64) -> String {
    if max <= 0.0 {
        return String::new();
    }
    "#".repeat(((value / max) * 30.0).round() as usize)
}

/// Terminal columns taken by `c`: two for East Asian wide and fullwidth
/// characters, one otherwise.
fn char_width(c: char) -> usize {
    match c as u32 {
        0x1100..=0x115F
        | 0x2E80..=0x303E
        | 0x3041..=0x33FF
        | 0x3400..=0x4DBF
        | 0x4E00..=0x9FFF
        | 0xA000..=0xA4CF
        | 0xAC00..=0xD7A3
        | 0xF900..=0xFAFF
        | 0xFE30..=0xFE4F
        | 0xFF00..=0xFF60
        | 0xFFE0..=0xFFE6
        | 0x20000..=0x3FFFD => 2,
        _ => 1,
    }
}

fn display_width(s: &str) -> usize {
    s.chars().map(char_width).sum()
}

/// Cuts `s` to at most `width` columns, marking the cut with an ellipsis.
fn truncate(s: &str, width: usize) -> String {
    if display_width(s) <= width {
        return s.to_string();
    }
    let mut cut = String::new();
    let mut used = 0;
    for c in s.chars() {
        let w = char_width(c);
        if used + w + 1 > width {
            break;
        }
        cut.push(c);
        used += w;
    }
    cut.push('…');
    cut
}

/// A left-aligned table cell exactly `width` columns wide.
fn cell(s: &str, width: usize) -> String {
    let mut out = truncate(s, width);
    let pad = width.saturating_sub(display_width(&out));
    out.extend(std::iter::repeat(' ').take(pad));
    out
}
