mod cli;
mod commands;
mod render;

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use illust_store::local::FileBlobStore;
use illust_store::remote::InMemoryRecordService;
use illust_store::settings::RemoteSettings;
use illust_store::views::ListQuery;
use illust_store::{ProjectStore, Settings};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::from_filename(".env.local").ok();

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Commands::ConfigPath = cli.command {
        return config_path();
    }

    let settings = Settings::load().context("Failed to load settings")?;
    let data_dir = settings.data_dir().context("Cannot determine data directory")?;
    let blobs = Arc::new(FileBlobStore::new(data_dir));

    let store = if cli.dev {
        tracing::info!("Dev mode, using in-memory backend with demo data");
        ProjectStore::remote(Arc::new(InMemoryRecordService::seeded()), blobs)
    } else {
        ProjectStore::open(settings.persistence_mode(), blobs)?
    };
    store.load().await;

    match cli.command {
        Commands::List {
            status,
            search,
            sort,
        } => commands::list(
            &store,
            ListQuery {
                status,
                search,
                sort,
            },
        ),
        Commands::Add(args) => commands::add(&store, args).await?,
        Commands::Edit { id, fields } => commands::edit(&store, &id, fields).await?,
        Commands::Status { id, status } => commands::status(&store, &id, status).await?,
        Commands::Delete { id, yes } => commands::delete(&store, &id, yes).await?,
        Commands::Summary => commands::summary(&store),
        Commands::Monthly { limit } => commands::monthly(&store, limit),
        Commands::Categories => commands::categories(&store),
        Commands::Calendar { month } => commands::calendar(&store, month.as_deref())?,
        Commands::Export { out } => commands::export(&store, &out)?,
        Commands::ConfigPath => {}
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default = if verbose {
        "illust_store=debug,illust_cli=debug"
    } else {
        "illust_store=info,illust_cli=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn config_path() -> Result<()> {
    let path = Settings::config_path()?;
    if !path.exists() {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        // Placeholder values keep the app in local mode until they are replaced.
        let example = Settings {
            remote: RemoteSettings {
                url: Some("https://YOUR_PROJECT.supabase.co".to_string()),
                anon_key: Some("YOUR_SUPABASE_ANON_KEY".to_string()),
            },
            ..Default::default()
        };
        let raw = toml::to_string_pretty(&example)?;
        std::fs::write(&path, raw)
            .with_context(|| format!("Failed to write config at {}", path.display()))?;
    }
    println!("{}", path.display());
    Ok(())
}
