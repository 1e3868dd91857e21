//! `shopdb` command-line entry point.
//!
//! # Responsibility
//! - Wire tables, seed or load them from a data directory, run queries.
//! - Keep output deterministic so runs can be diffed.

mod sample;

use clap::{Parser, Subcommand, ValueEnum};
use log::info;
use shopdb_core::{
    build_report, default_log_level, init_logging, load_all, save_all, Buyer, Database, Good,
    SalesReport, Sale, Shop, TableKind,
};
use std::error::Error;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[clap(
    name = "shopdb",
    version = env!("CARGO_PKG_VERSION"),
    about = "In-memory retail table store with JSON snapshots and fixed analytics"
)]
struct Cli {
    /// Directory holding one `<table>.json` file per table.
    #[clap(long, global = true, default_value = "data")]
    data_dir: PathBuf,
    /// Log level: trace|debug|info|warn|error (build-mode default when omitted).
    #[clap(long, global = true)]
    log_level: Option<String>,
    /// Absolute directory for rolling log files; logging stays off when omitted.
    #[clap(long, global = true)]
    log_dir: Option<String>,
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create all tables, insert the sample dataset and write it to the data directory.
    Seed,
    /// Load all tables from the data directory and print every query result.
    Report {
        #[clap(long, value_enum, default_value = "text")]
        format: OutputFormat,
    },
    /// Load one table from the data directory and print it as JSON.
    Dump {
        /// Table name: buyer|shop|good|sale.
        table: String,
    },
    /// Print the core crate version.
    Version,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Some(log_dir) = cli.log_dir.as_deref() {
        let level = cli.log_level.as_deref().unwrap_or(default_log_level());
        if let Err(err) = init_logging(level, log_dir) {
            eprintln!("error: {err}");
            return ExitCode::FAILURE;
        }
    }

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), Box<dyn Error>> {
    match &cli.command {
        Command::Seed => {
            let mut db = Database::new();
            let rows = sample::seed(&mut db)?;
            let written = save_all(&db, &cli.data_dir)?;
            info!(
                "event=cli_seed module=cli status=ok rows={} tables={}",
                rows,
                written.len()
            );
            println!(
                "seeded {rows} rows into {} tables under {}",
                written.len(),
                cli.data_dir.display()
            );
        }
        Command::Report { format } => {
            let db = open_store(&cli.data_dir)?;
            let report = build_report(&db)?;
            match format {
                OutputFormat::Text => print_report(&report),
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
            }
        }
        Command::Dump { table } => {
            let kind = TableKind::parse(table)
                .ok_or_else(|| format!("unknown table `{table}`; expected buyer|shop|good|sale"))?;
            let db = open_store(&cli.data_dir)?;
            let json = match kind {
                TableKind::Buyer => serde_json::to_string_pretty(db.get_table::<Buyer>()?)?,
                TableKind::Shop => serde_json::to_string_pretty(db.get_table::<Shop>()?)?,
                TableKind::Good => serde_json::to_string_pretty(db.get_table::<Good>()?)?,
                TableKind::Sale => serde_json::to_string_pretty(db.get_table::<Sale>()?)?,
            };
            println!("{json}");
        }
        Command::Version => {
            println!("shopdb_core version={}", shopdb_core::core_version());
        }
    }
    Ok(())
}

/// Creates every table and fills it from `data_dir`; missing files leave
/// their table empty.
fn open_store(data_dir: &Path) -> Result<Database, Box<dyn Error>> {
    let mut db = Database::new();
    db.create_table::<Buyer>();
    db.create_table::<Shop>();
    db.create_table::<Good>();
    db.create_table::<Sale>();

    let summary = load_all(&mut db, data_dir)?;
    for kind in &summary.missing {
        eprintln!("warning: no {kind}.json in {}", data_dir.display());
    }
    Ok(db)
}

fn print_report(report: &SalesReport) {
    let goods = report
        .longest_name_buyer_goods
        .iter()
        .map(|good| format!("{}:{}", good.id, good.category))
        .collect::<Vec<_>>();
    println!("longest_name_buyer_goods: [{}]", goods.join(", "));
    println!(
        "most_expensive_good_category: {}",
        report.most_expensive_good_category.as_deref().unwrap_or("-")
    );
    println!(
        "minimum_sales_city: {}",
        report.minimum_sales_city.as_deref().unwrap_or("-")
    );
    println!("top_popular_buyers:");
    for (rank, entry) in report.top_popular_buyers.iter().enumerate() {
        println!(
            "  {}. {} (id {}) bought {}",
            rank + 1,
            entry.buyer.name,
            entry.buyer.id,
            entry.total_count
        );
    }
    println!(
        "minimum_shops_per_country: {}",
        report.minimum_shops_per_country
    );
    let sale_ids = report
        .cross_city_filtered_sales
        .iter()
        .map(|sale| sale.id.to_string())
        .collect::<Vec<_>>();
    println!("cross_city_filtered_sales: [{}]", sale_ids.join(", "));
    println!("total_sales_value: {}", report.total_sales_value);
}
