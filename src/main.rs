use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use treeweave::decode::{DecodeConfig, Decoder};
use treeweave::parser::DEFAULT_MAX_FILE_SIZE;

#[derive(Parser)]
#[command(name = "treeweave")]
#[command(about = "Rebuild a binary tree from unordered node descriptions")]
struct Cli {
    /// Input file, one node description per line
    #[arg(short, long)]
    file: PathBuf,

    /// Allow nodes with a single child (incomplete-tree mode)
    #[arg(short, long)]
    incomplete: bool,

    /// Allow the same identifier for several distinct nodes
    #[arg(short, long)]
    duplicate_ids: bool,

    /// Maximum input file size in bytes
    #[arg(long, default_value_t = DEFAULT_MAX_FILE_SIZE)]
    max_file_size: u64,
}

fn main() -> ExitCode {
    // Help counts as a usage error as well
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            return ExitCode::from(2);
        }
    };

    // Logs go to stderr, traversals to stdout
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = DecodeConfig::new()
        .with_complete_tree(!cli.incomplete)
        .with_duplicate_ids(cli.duplicate_ids)
        .with_max_file_size(cli.max_file_size);

    match Decoder::new(config).decode_file(&cli.file) {
        Ok(tree) => {
            println!("{}", tree.bfs_labels());
            println!("{}", tree.in_order_labels());
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("Error decoding {}: {}", cli.file.display(), err);
            ExitCode::FAILURE
        }
    }
}
