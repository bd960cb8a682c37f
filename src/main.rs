use tracing_subscriber::EnvFilter;

fn main() {
    // Logs go to stderr so stdout carries only the journal.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    if let Err(e) = double_entry::app::run(std::env::args()) {
        eprintln!("{e}");
        std::process::exit(1);
    }
}
