use std::io::{self, BufRead, Write};
use std::path::Path;

use anyhow::{bail, Context, Result};
use illust_store::domain::date;
use illust_store::views::{self, ListQuery};
use illust_store::{ProjectInput, ProjectStore, Status};
use time::{Date, Month};

use crate::cli::{AddArgs, EditArgs};
use crate::render;

const RECENT_TITLE_SUGGESTIONS: usize = 5;

pub fn list(store: &ProjectStore, query: ListQuery) {
    let projects = store.projects();
    print!("{}", render::project_table(&query.apply(&projects)));
}

pub async fn add(store: &ProjectStore, args: AddArgs) -> Result<()> {
    let delivery_date = match args.delivery_date.as_deref() {
        Some(raw) => parse_date(raw)?,
        None => date::today(),
    };
    let input = ProjectInput {
        title: args.title,
        category: args.category,
        price: args.price,
        hours: args.hours,
        delivery_date: Some(delivery_date),
        status: args.status,
    };
    if let Err(e) = input.validate() {
        let recent = views::recent_titles(&store.projects(), RECENT_TITLE_SUGGESTIONS).join(", ");
        if e.field == "title" && !recent.is_empty() {
            bail!("Invalid project: {e} (recent titles: {recent})");
        }
        bail!("Invalid project: {e}");
    }

    let project = store.create(input).await.context("Failed to add project")?;
    println!("Added {} ({})", project.title, project.id);
    Ok(())
}

pub async fn edit(store: &ProjectStore, id: &str, fields: EditArgs) -> Result<()> {
    let current = store
        .get(id)
        .with_context(|| format!("No project with id {id}"))?;

    let mut input = current.input();
    if let Some(title) = fields.title {
        input.title = title;
    }
    if let Some(category) = fields.category {
        input.category = category;
    }
    if let Some(price) = fields.price {
        input.price = price;
    }
    if let Some(hours) = fields.hours {
        input.hours = hours;
    }
    if let Some(raw) = fields.delivery_date.as_deref() {
        input.delivery_date = Some(parse_date(raw)?);
    }
    if let Some(status) = fields.status {
        input.status = status;
    }
    input
        .validate()
        .map_err(|e| anyhow::anyhow!("Invalid project: {e}"))?;

    store
        .edit(id, input)
        .await
        .with_context(|| format!("Failed to update project {id}"))?;
    println!("Updated {id}");
    Ok(())
}

pub async fn status(store: &ProjectStore, id: &str, status: Status) -> Result<()> {
    if store.get(id).is_none() {
        bail!("No project with id {id}");
    }
    store
        .update_status(id, status)
        .await
        .with_context(|| format!("Failed to change status of {id}"))?;
    println!("{id} is now {status}");
    Ok(())
}

pub async fn delete(store: &ProjectStore, id: &str, yes: bool) -> Result<()> {
    let project = store
        .get(id)
        .with_context(|| format!("No project with id {id}"))?;

    if !yes && !confirm(&format!("Delete \"{}\"? [y/N] ", project.title))? {
        println!("Cancelled");
        return Ok(());
    }

    store
        .delete(id)
        .await
        .with_context(|| format!("Failed to delete project {id}"))?;
    println!("Deleted {}", project.title);
    Ok(())
}

pub fn summary(store: &ProjectStore) {
    print!("{}", render::summary(&views::summary(&store.projects())));
}

pub fn monthly(store: &ProjectStore, limit: usize) {
    print!(
        "{}",
        render::monthly(&views::monthly_revenue(&store.projects(), limit))
    );
}

pub fn categories(store: &ProjectStore) {
    print!(
        "{}",
        render::categories(&views::category_revenue(&store.projects()))
    );
}

pub fn calendar(store: &ProjectStore, month: Option<&str>) -> Result<()> {
    let today = date::today();
    let (year, month) = match month {
        Some(raw) => parse_month(raw)?,
        None => (today.year(), today.month()),
    };
    let cal = views::calendar_month(&store.projects(), year, month, today)
        .context("Failed to build calendar")?;
    println!("{}", render::calendar(&cal));
    Ok(())
}

pub fn export(store: &ProjectStore, out: &Path) -> Result<()> {
    let export = store.export_snapshot().context("Export failed")?;
    let path = export
        .write_to(out)
        .with_context(|| format!("Failed to write export to {}", out.display()))?;
    println!("Exported to {}", path.display());
    Ok(())
}

fn parse_date(raw: &str) -> Result<Date> {
    date::parse_iso(raw).with_context(|| format!("Invalid date {raw:?}, expected YYYY-MM-DD"))
}

fn parse_month(raw: &str) -> Result<(i32, Month)> {
    let (year, month) = raw
        .trim()
        .split_once('-')
        .with_context(|| format!("Invalid month {raw:?}, expected YYYY-MM"))?;
    let year: i32 = year
        .parse()
        .with_context(|| format!("Invalid year in {raw:?}"))?;
    let month: u8 = month
        .parse()
        .with_context(|| format!("Invalid month in {raw:?}"))?;
    let month = Month::try_from(month).with_context(|| format!("Invalid month in {raw:?}"))?;
    Ok((year, month))
}

fn confirm(prompt: &str) -> Result<bool> {
    print!("{prompt}");
    io::stdout().flush()?;
    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}
