use clap::Parser;
use tracing_subscriber::EnvFilter;

fn main() {
    // Silent unless RUST_LOG asks otherwise; warnings would tear up the TUI.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("off")))
        .with_writer(std::io::stderr)
        .init();

    let cli = troika::cli::Cli::parse();

    if let Err(e) = troika::cli::run(cli) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
