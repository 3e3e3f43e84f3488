// src/main.rs
// =============================================================================
// This is the entry point of the spider binary.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Validate them into a CrawlConfig (fatal errors stop here)
// 3. Crawl, download, and print the report
// 4. Exit with proper code (0 = clean run, 1 = finished with errors, 2 = fatal)
// =============================================================================

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::Cli;
use image_spider::{CancelFlag, CrawlConfig, CrawlReport};
use std::time::Instant;

#[tokio::main]
async fn main() {
    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

async fn run() -> Result<i32> {
    let cli = Cli::parse();
    image_spider::logging::init(cli.verbose);

    let config = CrawlConfig::new(cli.options()).context("invalid configuration")?;

    // Ctrl-C stops the crawl at the next task boundary; what was found so far
    // is still downloaded and reported
    let cancel = CancelFlag::new();
    let on_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            eprintln!("\nStopping after the current task...");
            on_signal.cancel();
        }
    });

    let started = Instant::now();
    let report = image_spider::run(&config, cancel).await?;
    let elapsed = started.elapsed();

    if cli.json {
        let json_output = serde_json::to_string_pretty(&report)?;
        println!("{}", json_output);
    } else {
        print_summary(&report, elapsed.as_secs_f64());
    }

    Ok(if report.is_clean() { 0 } else { 1 })
}

fn print_summary(report: &CrawlReport, elapsed_secs: f64) {
    println!("Elapsed time: {:.2} seconds", elapsed_secs);
    if let Some(scope) = &report.scope {
        println!("Scope: {}", scope);
    }
    println!("Visited URLs -> {}", report.visited.len());
    println!(
        "Images -> {} found, {} saved",
        report.images.len(),
        report.saved()
    );

    if report.cancelled {
        println!("Crawl was cancelled; results are partial.");
    }

    let errors = report.error_entries();
    if !errors.is_empty() {
        println!();
        println!("Errors ({}):", errors.len());
        for entry in errors {
            println!("  {}", entry);
        }
    }
}
