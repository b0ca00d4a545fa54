use std::io::Write;

use proxy_probe::config::ProbeConfig;
use proxy_probe::observability::init_tracing;
use proxy_probe::probe::run_probe;

fn main() {
    let config = ProbeConfig::default();
    init_tracing(&config.log_level);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_io()
        .enable_time()
        .build()
        .unwrap_or_else(|e| {
            eprintln!("Failed to initialize Tokio runtime: {e}");
            std::process::exit(1);
        });

    runtime.block_on(async move {
        let stdout = std::io::stdout();
        let mut out = stdout.lock();
        if let Err(err) = run_probe(&config, &mut out).await {
            // Report and terminate normally; a single attempt, no retries.
            let _ = writeln!(out, "Request error: {err}");
        }
    });
}
