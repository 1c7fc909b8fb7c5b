use std::process::ExitCode;

use tracing_subscriber::EnvFilter;

use transit_index::TransitIndex;
use transit_index::feed::FeedSnapshot;

fn usage() -> ExitCode {
    eprintln!("usage: transit-index <snapshot.json> [query]");
    ExitCode::from(2)
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut args = std::env::args().skip(1);
    let Some(path) = args.next() else {
        return usage();
    };
    let query: Vec<String> = args.collect();

    let snapshot = match FeedSnapshot::from_path(&path) {
        Ok(snapshot) => snapshot,
        Err(e) => {
            eprintln!("Failed to read {path}: {e}");
            return ExitCode::FAILURE;
        }
    };

    let index = TransitIndex::new();
    let report = index.load(snapshot);

    let output = if query.is_empty() {
        serde_json::to_string_pretty(&report)
    } else {
        serde_json::to_string_pretty(&index.search(&query.join(" ")))
    };
    match output {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Failed to encode output: {e}");
            ExitCode::FAILURE
        }
    }
}
