mod render;

use anyhow::{anyhow, Context};
use bytesize::ByteSize;
use clap::Parser;
use folderstats_core::export;
use folderstats_core::{Progress, ScanError, ScanMsg, ScanOptions, Scanner, DEFAULT_TEXT_EXTENSIONS};
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "folderstats", about = "Prints file statistics by directory and by extension")]
struct Args {
    /// Directories to print statistics for
    #[arg(default_value = ".")]
    roots: Vec<PathBuf>,
    /// Comma-separated extensions to count lines for, e.g. "js,py,cs"
    #[arg(long)]
    text: Option<String>,
    /// Comma-separated extensions to restrict the scan to
    #[arg(long)]
    only: Option<String>,
    /// Worker threads (0 = one per CPU)
    #[arg(short, long, default_value_t = 0)]
    threads: usize,
    /// Follow symbolic links (no cycle detection)
    #[arg(long)]
    follow_links: bool,
    /// Also write the report as JSON
    #[arg(long)]
    json: Option<PathBuf>,
    /// Also write the report as CSV
    #[arg(long)]
    csv: Option<PathBuf>,
    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Args {
    fn scan_options(&self) -> ScanOptions {
        ScanOptions::default()
            .with_text_extensions(self.text.as_deref().unwrap_or(DEFAULT_TEXT_EXTENSIONS))
            .with_include_extensions(self.only.as_deref().unwrap_or(""))
            .with_threads(self.threads)
            .with_follow_links(self.follow_links)
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => match err.downcast_ref::<ScanError>() {
            Some(ScanError::Cancelled) => {
                eprintln!("cancelled");
                ExitCode::from(130)
            }
            _ => {
                eprintln!("error: {err:#}");
                ExitCode::FAILURE
            }
        },
    }
}

fn run(args: Args) -> anyhow::Result<()> {
    let cancel = Arc::new(AtomicBool::new(false));
    ctrlc::set_handler({
        let cancel = cancel.clone();
        move || cancel.store(true, Ordering::Relaxed)
    })
    .context("failed to install Ctrl-C handler")?;

    let (tx, rx) = crossbeam_channel::unbounded::<ScanMsg>();
    let scanner = Scanner::new(args.scan_options(), cancel).with_progress(tx);
    let handle = std::thread::spawn({
        let roots = args.roots.clone();
        move || scanner.scan(&roots)
    });

    let mut last = Progress::default();
    for msg in rx.iter() {
        match msg {
            ScanMsg::Progress(p) | ScanMsg::Finished(p) => last = p,
            ScanMsg::DirDone { path, stats } => {
                debug!(path = %path.display(), files = stats.count, "directory done");
            }
            ScanMsg::Failed(e) => debug!(error = %e, "scan failed"),
        }
    }
    let report = handle
        .join()
        .map_err(|_| anyhow!("scanner thread panicked"))??;

    info!(
        "Scanned {} files in {} directories, {}",
        last.files,
        last.dirs,
        ByteSize(last.bytes)
    );

    if let Some(path) = &args.json {
        let json = serde_json::to_string_pretty(&export::to_json(&report))?;
        std::fs::write(path, json)
            .with_context(|| format!("failed to write {}", path.display()))?;
    }
    if let Some(path) = &args.csv {
        let file = File::create(path)
            .with_context(|| format!("failed to create {}", path.display()))?;
        export::to_csv(&report, BufWriter::new(file))?;
    }

    print!("{}", render::render(&report));
    Ok(())
}
