//! Command-line front end: parse arguments, run the search, report results
//! and keep a checkpoint so long runs can be continued.

mod cli;

use clap::Parser;
use std::fs;
use std::path::Path;
use std::time::{Duration, Instant};

use crate::constants::CHECKPOINT_INTERVAL_SECS;
use crate::error::Result;
use crate::save::{SearchCheckpoint, save_checkpoint};
use crate::search::{
    CompletionReason, SearchEvent, SearchOptions, SearchRequest, SearchResult, Searcher,
};
use crate::world::loot::{LootTable, generate_loot_by_chest, summarize};

pub use cli::Args;

pub fn run() -> Result<()> {
    let args = Args::parse();
    let request = args.build_request()?;
    let table = match &args.loot_table {
        Some(path) => LootTable::load(path)?,
        None => LootTable::desert_pyramid()?,
    };
    let checkpoint_path = args.checkpoint_path();

    let searcher = Searcher::new(table.clone()).with_options(SearchOptions {
        progress_interval_ms: args.progress_ms,
        result_limit: args.limit,
    });
    let events = searcher.start(request.clone())?;

    let mut last_save = Instant::now();
    let mut found = 0u64;
    for event in events.iter() {
        match event {
            SearchEvent::Progress(progress) => {
                tracing::info!(
                    "{:.4}% | seed {} | {} seeds/s | {} found",
                    progress.percent_complete,
                    progress.current_seed,
                    progress.seeds_per_second,
                    found
                );
                if last_save.elapsed() >= Duration::from_secs(CHECKPOINT_INTERVAL_SECS) {
                    if let Some(next_seed) = searcher.resume_seed() {
                        write_checkpoint(&checkpoint_path, &request, next_seed);
                    }
                    last_save = Instant::now();
                }
            }
            SearchEvent::Found(result) => {
                found += 1;
                print_result(&table, &result);
            }
            SearchEvent::Completed(reason) => {
                finish(&checkpoint_path, &request, reason, searcher.resume_seed());
                break;
            }
        }
    }

    searcher.wait();
    tracing::info!("{} matching seeds", found);
    Ok(())
}

fn print_result(table: &LootTable, result: &SearchResult) {
    let pos = result.position;
    println!("seed {} | chunk {} | block {}", result.seed, pos, pos.to_block());
    for (chest, loot) in generate_loot_by_chest(table, result.seed, pos.x, pos.z)
        .iter()
        .enumerate()
    {
        println!("  chest {}: {}", chest, summarize(loot));
    }
}

fn finish(path: &Path, request: &SearchRequest, reason: CompletionReason, resume: Option<u64>) {
    let remaining = resume.filter(|&next_seed| {
        reason != CompletionReason::Exhausted && next_seed < request.end_seed
    });
    match remaining {
        Some(next_seed) => {
            write_checkpoint(path, request, next_seed);
            tracing::info!(
                "Stopped at seed {}; continue with --resume --checkpoint {}",
                next_seed,
                path.display()
            );
        }
        None if path.exists() => {
            if let Err(e) = fs::remove_file(path) {
                tracing::warn!("Failed to remove checkpoint {}: {}", path.display(), e);
            }
        }
        None => {}
    }
}

fn write_checkpoint(path: &Path, request: &SearchRequest, next_seed: u64) {
    let checkpoint = SearchCheckpoint::from_request(request, next_seed);
    if let Err(e) = save_checkpoint(path, &checkpoint) {
        tracing::error!("Failed to save checkpoint {}: {}", path.display(), e);
    }
}
