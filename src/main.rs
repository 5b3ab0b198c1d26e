use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::info;
use rayon::prelude::*;
use serde::Serialize;
use std::io::Write;

use bwt_search::index::{bwt, fm, locate};
use bwt_search::io::fasta::FastaReader;
use bwt_search::util::dna;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

#[derive(Parser, Debug)]
#[command(name = "bwt-search", author, version, about = "Exact substring search with a BWT/FM index", arg_required_else_help = true)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the Burrows-Wheeler transform of the input
    Transform {
        /// Input file (raw bytes, or FASTA with --fasta)
        input: String,
        /// Treat input as FASTA and transform each record
        #[arg(long)]
        fasta: bool,
    },
    /// Build an FM index over the input and search for patterns
    Search {
        /// Input file (raw bytes, or FASTA with --fasta)
        input: String,
        /// Patterns to search for
        #[arg(required = true)]
        patterns: Vec<String>,
        /// Treat input as FASTA and index each record separately
        #[arg(long)]
        fasta: bool,
        /// Rank checkpoint interval
        #[arg(long, default_value_t = fm::IndexOpt::default().jump)]
        jump: usize,
        /// Suffix sampling interval for offset lookup
        #[arg(long = "sample-rate", default_value_t = fm::IndexOpt::default().sample_rate)]
        sample_rate: usize,
        /// Also search the reverse complement of each pattern
        #[arg(long)]
        revcomp: bool,
        /// Print reports as JSON
        #[arg(long)]
        json: bool,
        #[arg(short = 't', long = "threads", default_value_t = 1)]
        threads: usize,
    },
}

/// One named byte sequence to index.
struct Target {
    name: String,
    seq: Vec<u8>,
}

struct IndexedTarget {
    name: String,
    index: fm::SearchIndex,
    positions: locate::PositionMap,
}

#[derive(Serialize, Debug)]
struct Report {
    target: String,
    pattern: String,
    strand: char,
    count: usize,
    rows: Vec<usize>,
    offsets: Vec<usize>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logger(cli.verbose);
    match cli.command {
        Commands::Transform { input, fasta } => run_transform(&input, fasta),
        Commands::Search {
            input,
            patterns,
            fasta,
            jump,
            sample_rate,
            revcomp,
            json,
            threads,
        } => {
            let opt = fm::IndexOpt { jump, sample_rate };
            run_search(&input, &patterns, fasta, opt, revcomp, json, threads)
        }
    }
}

fn init_logger(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

fn load_targets(path: &str, fasta: bool) -> Result<Vec<Target>> {
    if !fasta {
        let seq = std::fs::read(path).with_context(|| format!("cannot read input '{}'", path))?;
        if seq.contains(&bwt::SENTINEL) {
            anyhow::bail!("input '{}' contains the sentinel byte '$'", path);
        }
        return Ok(vec![Target { name: path.to_string(), seq }]);
    }

    let fh = std::fs::File::open(path).with_context(|| format!("cannot open FASTA '{}'", path))?;
    let records = FastaReader::new(std::io::BufReader::new(fh)).read_all()?;
    if records.is_empty() {
        anyhow::bail!("FASTA file '{}' contains no sequences", path);
    }
    info!("{}: {} records", path, records.len());
    Ok(records
        .into_iter()
        .map(|rec| Target { name: rec.id, seq: dna::normalize_seq(&rec.seq) })
        .collect())
}

fn run_transform(input: &str, fasta: bool) -> Result<()> {
    let targets = load_targets(input, fasta)?;
    let stdout = std::io::stdout();
    let mut out = std::io::BufWriter::new(stdout.lock());
    write_transforms(&mut out, &targets, fasta)?;
    out.flush()?;
    Ok(())
}

/// One BWT line per target; FASTA records get their `>id` header first.
fn write_transforms<W: Write>(out: &mut W, targets: &[Target], fasta: bool) -> Result<()> {
    for t in targets {
        if fasta {
            writeln!(out, ">{}", t.name)?;
        }
        out.write_all(&bwt::transform(&t.seq))?;
        writeln!(out)?;
    }
    Ok(())
}

fn build_target(t: Target, opt: fm::IndexOpt) -> Result<IndexedTarget> {
    let index = fm::SearchIndex::build_with_opt(bwt::transform(&t.seq), opt)
        .with_context(|| format!("cannot build index for '{}'", t.name))?;
    let positions = locate::PositionMap::build(&index, opt.sample_rate)?;
    info!("indexed {} ({} rows)", t.name, index.rows());
    Ok(IndexedTarget { name: t.name, index, positions })
}

fn query(target: &IndexedTarget, pattern: &str, strand: char, bytes: &[u8]) -> Result<Report> {
    let (rows, offsets) = match target.index.backward_search(bytes) {
        Some((l, r)) => {
            let mut offsets = target.positions.locate_range(&target.index, l, r)?;
            offsets.sort_unstable();
            ((l..r).collect(), offsets)
        }
        None => (Vec::new(), Vec::new()),
    };
    Ok(Report {
        target: target.name.clone(),
        pattern: pattern.to_string(),
        strand,
        count: rows.len(),
        rows,
        offsets,
    })
}

/// (pattern, strand, bytes); FASTA mode normalises patterns like the records.
fn build_queries(patterns: &[String], fasta: bool, revcomp: bool) -> Vec<(&str, char, Vec<u8>)> {
    let mut queries = Vec::with_capacity(patterns.len() * if revcomp { 2 } else { 1 });
    for p in patterns {
        let bytes = if fasta { dna::normalize_seq(p.as_bytes()) } else { p.as_bytes().to_vec() };
        let rc = revcomp.then(|| dna::revcomp(&bytes));
        queries.push((p.as_str(), '+', bytes));
        if let Some(rc) = rc {
            queries.push((p.as_str(), '-', rc));
        }
    }
    queries
}

/// Tab-separated line: target, pattern, strand, count, offsets (`*` when none).
fn format_report(r: &Report) -> String {
    let offsets = if r.offsets.is_empty() {
        "*".to_string()
    } else {
        r.offsets.iter().map(usize::to_string).collect::<Vec<_>>().join(",")
    };
    format!("{}\t{}\t{}\t{}\t{}", r.target, r.pattern, r.strand, r.count, offsets)
}

fn run_search(
    input: &str,
    patterns: &[String],
    fasta: bool,
    opt: fm::IndexOpt,
    revcomp: bool,
    json: bool,
    threads: usize,
) -> Result<()> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build()
        .context("cannot start worker pool")?;

    let targets = load_targets(input, fasta)?;
    let indexed: Vec<IndexedTarget> = pool.install(|| {
        targets
            .into_par_iter()
            .map(|t| build_target(t, opt))
            .collect::<Result<_>>()
    })?;

    let queries = build_queries(patterns, fasta, revcomp);

    let reports: Vec<Report> = pool.install(|| {
        indexed
            .par_iter()
            .flat_map_iter(|t| queries.iter().map(move |(p, s, b)| query(t, p, *s, b)))
            .collect::<Result<_>>()
    })?;

    let stdout = std::io::stdout();
    let mut out = std::io::BufWriter::new(stdout.lock());
    if json {
        serde_json::to_writer_pretty(&mut out, &reports)?;
        writeln!(out)?;
    } else {
        for r in &reports {
            writeln!(out, "{}", format_report(r))?;
        }
    }
    out.flush()?;
    Ok(())
}
