use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};

use catnav::app::{self, SessionRunner};
use catnav::media::FileProbe;
use catnav::{Catalog, CatalogOrder, NavigatorConfig};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OrderArg {
    /// Newest first
    Year,
    /// Stable shuffle
    Shuffled,
}

impl From<OrderArg> for CatalogOrder {
    fn from(order: OrderArg) -> Self {
        match order {
            OrderArg::Year => CatalogOrder::ByYear,
            OrderArg::Shuffled => CatalogOrder::Shuffled,
        }
    }
}

/// Replays an interaction script against the catalog navigator.
#[derive(Debug, Parser)]
#[command(name = "catnav", version)]
struct Args {
    /// Catalog manifest (defaults to the user config directory)
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Directory that media URLs resolve against (defaults to the catalog's directory)
    #[arg(long)]
    media_root: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = OrderArg::Year)]
    order: OrderArg,

    /// Session script; read from stdin when omitted
    #[arg(long)]
    script: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive("catnav=info".parse()?),
        )
        .init();

    let args = Args::parse();

    let catalog_path = match args.catalog {
        Some(path) => path,
        None => Catalog::default_path()?,
    };
    let catalog = Catalog::load(&catalog_path, args.order.into())?;

    let media_root = args.media_root.unwrap_or_else(|| {
        catalog_path
            .parent()
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."))
    });

    let script = match &args.script {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read script {:?}", path))?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read script from stdin")?;
            buf
        }
    };
    let commands = app::parse_script(&script)?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .context("failed to start runtime")?;

    let runner = SessionRunner::new(
        catalog.into_entries(),
        NavigatorConfig::from_env(),
        Arc::new(FileProbe::new(media_root)),
    );
    let report = runtime.block_on(runner.replay(&commands));

    for view in &report.views {
        println!("{}", view);
    }
    for slug in &report.navigations {
        println!("navigate {}", slug);
    }
    app::log_report(&report);

    Ok(())
}
