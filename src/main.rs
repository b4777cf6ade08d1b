use clap::Parser;
use tracing_subscriber::EnvFilter;

use picar_runtime::runtime::{Cli, run};

#[tokio::main]
async fn main() {
    // Setup logging (set RUST_LOG=info or debug)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse().unwrap()))
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        eprintln!("Runtime error: {}", e);
        std::process::exit(1);
    }
}
