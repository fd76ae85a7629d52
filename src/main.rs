use tracing_subscriber::EnvFilter;

fn main() {
    // Logging goes to stderr so redacted listings on stdout stay clean.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    if let Err(error) = secretsource::cli::run_cli() {
        eprintln!("error: {}", error);
        std::process::exit(1);
    }
}
