use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use illust_store::views::SortKey;
use illust_store::{Category, Status};

#[derive(Debug, Parser)]
#[command(name = "illustdash")]
#[command(about = "Track commissioned illustration work, revenue and deadlines")]
pub struct Cli {
    /// Run against a seeded in-memory backend instead of the configured one
    #[arg(long, global = true)]
    pub dev: bool,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// List projects
    List {
        #[arg(long)]
        status: Option<Status>,
        /// Case-insensitive title search
        #[arg(long, default_value = "")]
        search: String,
        /// created, price or delivery
        #[arg(long, default_value = "created")]
        sort: SortKey,
    },
    /// Add a project
    Add(AddArgs),
    /// Replace a project's fields; omitted fields keep their current values
    Edit {
        id: String,
        #[command(flatten)]
        fields: EditArgs,
    },
    /// Change the status of a project
    Status { id: String, status: Status },
    /// Delete a project
    Delete {
        id: String,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Totals, average hourly rate and delivered count
    Summary,
    /// Revenue per month
    Monthly {
        #[arg(long, default_value_t = 6)]
        limit: usize,
    },
    /// Revenue split by category
    Categories,
    /// Deliveries laid out on a month calendar
    Calendar {
        /// Month as YYYY-MM, defaults to the current month
        #[arg(long)]
        month: Option<String>,
    },
    /// Write all projects to a CSV file
    Export {
        /// Target directory
        #[arg(long, default_value = ".")]
        out: PathBuf,
    },
    /// Print config path and create default file if missing
    ConfigPath,
}

#[derive(Debug, Args)]
pub struct AddArgs {
    #[arg(long)]
    pub title: String,
    #[arg(long)]
    pub category: Category,
    /// Price in yen
    #[arg(long)]
    pub price: f64,
    /// Working hours in steps of 0.5
    #[arg(long)]
    pub hours: f64,
    /// YYYY-MM-DD, defaults to today
    #[arg(long)]
    pub delivery_date: Option<String>,
    #[arg(long, default_value = "in-progress")]
    pub status: Status,
}

#[derive(Debug, Args)]
pub struct EditArgs {
    #[arg(long)]
    pub title: Option<String>,
    #[arg(long)]
    pub category: Option<Category>,
    #[arg(long)]
    pub price: Option<f64>,
    #[arg(long)]
    pub hours: Option<f64>,
    #[arg(long)]
    pub delivery_date: Option<String>,
    #[arg(long)]
    pub status: Option<Status>,
}
