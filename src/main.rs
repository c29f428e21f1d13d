use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;
use windex::IndexConfig;

#[derive(Parser)]
#[command(name = "windex")]
#[command(about = "Build a per-letter inverted word index over a list of files", long_about = None)]
struct Cli {
    /// Number of mapper threads
    #[arg(value_parser = clap::value_parser!(u32).range(1..))]
    mappers: u32,
    /// Number of reducer threads
    #[arg(value_parser = clap::value_parser!(u32).range(1..))]
    reducers: u32,
    /// Manifest: a file count followed by that many paths
    manifest: PathBuf,
    /// Directory for the a.txt..z.txt outputs
    #[arg(long, default_value = ".")]
    output_dir: PathBuf,
    /// Also write the run summary as JSON
    #[arg(long)]
    summary: Option<PathBuf>,
    /// Exit with status 2 if any input file was skipped or any letter failed
    #[arg(long)]
    strict: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = IndexConfig::new(cli.mappers as usize, cli.reducers as usize, &cli.manifest)
        .with_output_dir(&cli.output_dir);

    let summary = match windex::run(&config) {
        Ok(summary) => summary,
        Err(e) => {
            eprintln!("[windex] {}", e);
            return ExitCode::FAILURE;
        }
    };

    summary.print();

    if let Some(path) = &cli.summary {
        if let Err(e) = summary.write_json(path) {
            eprintln!("[windex] cannot write summary to {}: {}", path.display(), e);
            return ExitCode::FAILURE;
        }
    }

    if cli.strict && !summary.is_clean() {
        return ExitCode::from(2);
    }
    ExitCode::SUCCESS
}
