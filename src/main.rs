use clap::Parser;

use ackd::config::{self, ServerConfig};
use ackd::http::AckServer;
use ackd::lifecycle::{daemonize, Reaper};
use ackd::net::Listener;
use ackd::observability::init_logging;

/// Exit status for a rejected command line.
const USAGE_EXIT_CODE: i32 = 8;

#[derive(Parser)]
#[command(name = "ackd", about = "Minimal TCP acknowledgement server")]
struct Cli {
    /// Run the server in the background.
    #[arg(short = 'D', long = "daemon")]
    daemon: bool,
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(_) => usage(),
    };

    let config = match config::load_default() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("ERROR loading configuration: {}", e);
            std::process::exit(1);
        }
    };

    // Detach before the runtime exists; forking with live runtime
    // threads is not sound. Logging comes up in the surviving context.
    if cli.daemon {
        if let Err(e) = daemonize() {
            eprintln!("Cannot daemonize: {}", e);
            std::process::exit(1);
        }
    }

    if let Err(e) = init_logging(&config.observability, cli.daemon) {
        // Best effort: stdio is already detached when daemonized.
        eprintln!("ERROR initializing logging: {}", e);
        std::process::exit(1);
    }

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        daemon = cli.daemon,
        pid = std::process::id(),
        "ackd starting"
    );

    let runtime = match tokio::runtime::Builder::new_multi_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(e) => {
            tracing::error!(error = %e, "Failed to start runtime");
            std::process::exit(1);
        }
    };

    if let Err(e) = runtime.block_on(serve(config)) {
        tracing::error!(error = %e, "Server terminated");
        std::process::exit(1);
    }
}

async fn serve(config: ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    let listener = Listener::bind(&config.listener).await?;

    let reaper = Reaper::spawn();
    let server = AckServer::new(reaper);
    server.run(listener).await?;

    Ok(())
}

fn usage() -> ! {
    eprintln!("Usage:");
    eprintln!("  ackd [-D]");
    eprintln!();
    eprintln!("  -D, --daemon    run the server in the background");
    std::process::exit(USAGE_EXIT_CODE);
}
