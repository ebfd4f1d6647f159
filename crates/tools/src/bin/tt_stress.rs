//! 置換表ストレスツール
//!
//! 複数スレッドから共有テーブルにランダムな fingerprint で store/probe を繰り返し、
//! ヒットした値がすべてその fingerprint 用に書かれた値であることを検証する。
//! 終了時に統計情報（テキストまたは JSON）を出力する。

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result, bail};
use clap::Parser;
use rand::{Rng, RngCore};
use rand_xoshiro::Xoshiro256PlusPlus;
use rand_xoshiro::rand_core::SeedableRng;
use serde::Serialize;
use ttable_core::payload::{Bound, SearchResult};
use ttable_core::{ReplacementPolicy, TableConfig, TableStats, TranspositionTable};

#[derive(Parser, Debug)]
#[command(name = "tt_stress")]
#[command(about = "Hammer a shared transposition table from several threads and verify every hit")]
struct Cli {
    /// TOML file with `hash_bytes` / `policy` (CLI flags override it)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Table size in MiB
    #[arg(long)]
    hash_mb: Option<usize>,

    /// Replacement policy (depth-preferred | always-replace)
    #[arg(long)]
    policy: Option<ReplacementPolicy>,

    /// Number of worker threads
    #[arg(short, long, default_value_t = 4)]
    threads: usize,

    /// store/probe pairs per thread and per search
    #[arg(short, long, default_value_t = 1_000_000)]
    iterations: u64,

    /// Number of searches (generations) to run
    #[arg(long, default_value_t = 4)]
    searches: u32,

    /// Distinct positions per search; smaller values force more transpositions
    #[arg(long, default_value_t = 1 << 16)]
    positions: u64,

    /// RNG seed (each worker uses seed + worker index)
    #[arg(long, default_value_t = 0x5EED)]
    seed: u64,

    /// Print statistics as JSON
    #[arg(long, default_value_t = false)]
    json: bool,
}

#[derive(Serialize)]
struct Report {
    policy: ReplacementPolicy,
    capacity: usize,
    size_bytes: usize,
    threads: usize,
    searches: u32,
    hashfull: u16,
    elapsed_ms: u128,
    verified_hits: u64,
    stats: TableStats,
}

/// Payload every worker stores for `fingerprint`; any other value on a hit is a torn read
fn payload_for(fingerprint: u64, depth: u8) -> u64 {
    let mv = (fingerprint >> 32) as u32 | 1;
    let score = (fingerprint & 0x3FFF) as i32 - 0x2000;
    SearchResult::new(Bound::Exact, score, depth, mv).pack()
}

/// Deterministic fingerprint for position `index` of search `search`
fn fingerprint_of(search: u32, index: u64) -> u64 {
    let mixed = (index ^ ((search as u64) << 48)).wrapping_mul(0x9E37_79B9_7F4A_7C15);
    (mixed ^ (mixed >> 31)) | 1
}

fn load_config(cli: &Cli) -> Result<TableConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            toml::from_str::<TableConfig>(&text)
                .with_context(|| format!("invalid table config {}", path.display()))?
        }
        None => TableConfig::default(),
    };
    if let Some(mb) = cli.hash_mb {
        config.hash_bytes = TableConfig::with_hash_mb(mb).hash_bytes;
    }
    if let Some(policy) = cli.policy {
        config.policy = policy;
    }
    Ok(config)
}

fn run_worker(tt: &TranspositionTable, cli: &Cli, search: u32, worker: usize) -> Result<u64> {
    let seed = cli.seed.wrapping_add(worker as u64).wrapping_add((search as u64) << 32);
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
    let mut verified = 0u64;

    for _ in 0..cli.iterations {
        let f = fingerprint_of(search, rng.next_u64() % cli.positions);
        if let Some(value) = tt.probe(f) {
            let depth = SearchResult::unpack(value).depth;
            if value != payload_for(f, depth) {
                bail!(
                    "foreign value on hit: worker={worker} search={search} fingerprint=0x{f:016x} value=0x{value:016x}"
                );
            }
            verified += 1;
            continue;
        }
        let depth = rng.random_range(1..=32u8);
        tt.store(f, payload_for(f, depth));
    }
    Ok(verified)
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stderr)
        .init();

    let cli = Cli::parse();
    if cli.threads == 0 {
        bail!("--threads must be >= 1");
    }
    if cli.positions == 0 {
        bail!("--positions must be >= 1");
    }

    let config = load_config(&cli)?;
    let tt = TranspositionTable::from_config(&config)
        .with_context(|| format!("failed to allocate table of {} bytes", config.hash_bytes))?;
    log::info!(
        "tt_stress: threads={} iterations={} searches={} positions={} seed={}",
        cli.threads,
        cli.iterations,
        cli.searches,
        cli.positions,
        cli.seed
    );

    let start = Instant::now();
    let mut verified_hits = 0u64;
    for search in 0..cli.searches {
        if search > 0 {
            tt.new_search();
        }
        let results: Vec<Result<u64>> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..cli.threads)
                .map(|worker| {
                    let tt = &tt;
                    let cli = &cli;
                    scope.spawn(move || run_worker(tt, cli, search, worker))
                })
                .collect();
            handles
                .into_iter()
                .map(|h| h.join().unwrap_or_else(|_| Err(anyhow::anyhow!("worker panicked"))))
                .collect()
        });
        for result in results {
            verified_hits += result?;
        }
        log::info!("search {search} done: hashfull={}", tt.hashfull());
    }

    let report = Report {
        policy: tt.policy(),
        capacity: tt.capacity(),
        size_bytes: tt.size_bytes(),
        threads: cli.threads,
        searches: cli.searches,
        hashfull: tt.hashfull(),
        elapsed_ms: start.elapsed().as_millis(),
        verified_hits,
        stats: tt.stats(),
    };

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!(
            "policy={} capacity={} size={}B hashfull={} elapsed={}ms verified_hits={}",
            report.policy,
            report.capacity,
            report.size_bytes,
            report.hashfull,
            report.elapsed_ms,
            report.verified_hits
        );
        println!("{}", report.stats.to_summary_string());
    }
    Ok(())
}
