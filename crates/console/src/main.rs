//! StaffDesk terminal front end
//!
//! Lists one page of clients, subcontractors, or employees as a text table:
//!
//! ```text
//! staffdesk [clients|subcontractors|employees] [page]
//! ```

use anyhow::Context;
use clap::{Parser, ValueEnum};
use staffdesk_common::{config::AppConfig, metrics, models};
use staffdesk_console::{AppContext, ListPage, ParentEntity, TerminalConfirm};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "staffdesk")]
#[command(about = "List StaffDesk records as a text table")]
struct Cli {
    /// Records to list
    #[arg(value_enum, default_value_t = ResourceArg::Clients)]
    resource: ResourceArg,

    /// Page number, starting at 1
    #[arg(default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    page: u32,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum ResourceArg {
    Clients,
    Subcontractors,
    Employees,
}

fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.observability.log_level));

    if config.observability.json_logging {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
    }
}

async fn show<E: ParentEntity>(ctx: AppContext, page: u32) -> anyhow::Result<()> {
    let mut list: ListPage<E> = ListPage::new(ctx.clone());
    let result = list.go_to_page(page).await;

    println!("{}", list.table().to_text());
    if result.is_ok() {
        println!("Page {} of {} ({} total)", list.page(), list.total_pages(), list.count());
    }
    for toast in ctx.notifier.toasts() {
        eprintln!("[{:?}] {}", toast.level, toast.text);
    }

    result.with_context(|| format!("listing {} failed", E::RESOURCE))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = AppConfig::load().context("failed to load configuration")?;
    init_tracing(&config);
    info!(
        service = %config.observability.service_name,
        version = staffdesk_common::VERSION,
        "Starting StaffDesk console"
    );

    metrics::register_metrics();

    let ctx = AppContext::from_config(&config, Arc::new(TerminalConfirm))?;

    match cli.resource {
        ResourceArg::Clients => show::<models::Client>(ctx, cli.page).await,
        ResourceArg::Subcontractors => show::<models::Subcontractor>(ctx, cli.page).await,
        ResourceArg::Employees => show::<models::Employee>(ctx, cli.page).await,
    }
}
