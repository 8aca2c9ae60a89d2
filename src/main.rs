//! wordshard - Sharded Full-Text Index over SQLite
//!
//! Entry point for the CLI application.

use anyhow::{Context, Result};
use clap::Parser;
use std::io::{self, BufRead, Write};
use std::path::Path;
use std::process::ExitCode;
use std::sync::atomic::Ordering;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use wordshard::config::{CliArgs, Command, IndexConfig, SchemaAction};
use wordshard::indexer::Crawler;
use wordshard::progress::{print_header, print_summary, ProgressReporter};
use wordshard::search::{SearchEngine, SearchResults};
use wordshard::shard::ShardCatalog;
use wordshard::store::StorageGateway;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<()> {
    // Parse CLI arguments
    let args = CliArgs::parse();

    // Setup logging
    setup_logging(args.verbose);

    match args.command.clone() {
        Command::Index {
            root,
            extensions,
            exclude_patterns,
            keep_schema,
        } => {
            let config = IndexConfig::new(
                root,
                args.data_dir.clone(),
                extensions,
                exclude_patterns,
                keep_schema,
                args.quiet,
            )
            .context("Invalid configuration")?;
            run_index(config)
        }
        Command::Search { terms, limit } => {
            let limit = wordshard::config::validate_limit(limit)?;
            run_search(&args.data_dir, terms, limit)
        }
        Command::Schema { action } => run_schema(&args.data_dir, action),
        #[cfg(feature = "server")]
        Command::Serve { port, bind } => run_serve(&args.data_dir, &bind, port),
    }
}

/// Recreate the schema (unless kept) and index the corpus tree
fn run_index(config: IndexConfig) -> Result<()> {
    std::fs::create_dir_all(&config.data_dir).with_context(|| {
        format!(
            "Failed to create shard directory '{}'",
            config.data_dir.display()
        )
    })?;

    let mut gateway = StorageGateway::new(ShardCatalog::new(&config.data_dir));

    if config.reset_schema {
        info!("Recreating schema on all shards");
        gateway
            .recreate_schema()
            .context("Failed to recreate schema")?;
    }

    if config.show_progress {
        print_header(
            &config.root.display().to_string(),
            &config.extensions,
            &config.data_dir.display().to_string(),
        );
    }

    let mut crawler = Crawler::new(config.extensions.clone(), config.exclude_patterns.clone());

    // Setup signal handler for graceful shutdown
    let shutdown_flag = crawler.shutdown_flag();
    ctrlc::set_handler(move || {
        eprintln!("\nInterrupt received, shutting down...");
        shutdown_flag.store(true, Ordering::SeqCst);
    })
    .context("Failed to set signal handler")?;

    let progress = if config.show_progress {
        Some(ProgressReporter::new())
    } else {
        None
    };

    if let Some(ref p) = progress {
        p.set_status("Indexing...");
    }

    let stats = match progress {
        Some(ref p) => crawler
            .index_tree_with_progress(&mut gateway, &config.root, |snapshot| p.update(&snapshot)),
        None => crawler.index_tree(&mut gateway, &config.root),
    }
    .context("Indexing run failed")?;

    if let Some(ref p) = progress {
        if stats.completed {
            p.finish("Indexing completed");
        } else {
            p.finish("Indexing interrupted");
        }
    }

    print_summary(
        stats.documents,
        stats.words,
        stats.occurrences,
        stats.bytes,
        stats.errors,
        stats.duration,
        &config.data_dir.display().to_string(),
    );

    if !stats.completed {
        info!("Indexing was interrupted before completion");
    }

    if stats.errors > 0 {
        info!(skipped = stats.errors, "Some files could not be read");
    }

    Ok(())
}

/// One-shot search, or the interactive loop when no terms were given
fn run_search(data_dir: &Path, terms: Vec<String>, limit: usize) -> Result<()> {
    if !data_dir.is_dir() {
        anyhow::bail!(
            "Shard directory '{}' does not exist - run 'wordshard index' first",
            data_dir.display()
        );
    }

    let mut gateway = StorageGateway::new(ShardCatalog::new(data_dir));
    let engine = SearchEngine::new(&mut gateway).context("Failed to load word dictionary")?;

    if terms.is_empty() {
        interactive_loop(&engine, &mut gateway, limit)
    } else {
        let results = engine.search(&mut gateway, &terms, limit)?;
        print_results(&results);
        Ok(())
    }
}

/// Read queries from stdin until "q" or EOF
fn interactive_loop(
    engine: &SearchEngine,
    gateway: &mut StorageGateway,
    limit: usize,
) -> Result<()> {
    println!(
        "Console search over {} words - enter terms, q to quit",
        engine.word_count()
    );

    let stdin = io::stdin();
    loop {
        print!("> ");
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let input = line.trim();
        if input == "q" {
            break;
        }
        if input.is_empty() {
            continue;
        }

        let terms: Vec<String> = input.split_whitespace().map(str::to_string).collect();
        let results = engine.search(gateway, &terms, limit)?;
        print_results(&results);
    }

    Ok(())
}

fn print_results(results: &SearchResults) {
    for term in &results.ignored {
        println!("{} will be ignored", term);
    }

    for (idx, hit) in results.hits.iter().enumerate() {
        println!(
            "{}: {} -- contains {} search terms",
            idx + 1,
            hit.location,
            hit.matched
        );
    }

    println!(
        "Documents: {}. Time: {:.1} ms",
        results.total_matches,
        results.elapsed.as_secs_f64() * 1000.0
    );
}

/// Apply a schema action to every shard
fn run_schema(data_dir: &Path, action: SchemaAction) -> Result<()> {
    std::fs::create_dir_all(data_dir).with_context(|| {
        format!("Failed to create shard directory '{}'", data_dir.display())
    })?;

    let mut gateway = StorageGateway::new(ShardCatalog::new(data_dir));

    match action {
        SchemaAction::Recreate => {
            gateway
                .recreate_schema()
                .context("Failed to recreate schema")?;
            println!("Schema recreated on all shards");
        }
        SchemaAction::Drop => {
            gateway.reset_schema().context("Failed to drop schema")?;
            println!("Schema dropped on all shards");
        }
    }

    Ok(())
}

/// Run the HTTP storage facade
#[cfg(feature = "server")]
fn run_serve(data_dir: &Path, bind: &str, port: u16) -> Result<()> {
    std::fs::create_dir_all(data_dir).with_context(|| {
        format!("Failed to create shard directory '{}'", data_dir.display())
    })?;

    let catalog = ShardCatalog::new(data_dir);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to create async runtime")?;

    runtime.block_on(wordshard::server::serve(catalog, bind, port))?;
    Ok(())
}

fn setup_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("wordshard=debug,warn")
    } else {
        EnvFilter::new("wordshard=info,warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();
}
