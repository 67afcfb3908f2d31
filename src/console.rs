//! Console channel — each stdin line is one image request.
//!
//! Reads lines from stdin, runs them through the [`ImageAgent`], and hands
//! the reply to the [`DeliverySink`]. Runs until the `shutdown` token is
//! cancelled (Ctrl-C) or stdin is closed. An empty line is a valid request:
//! it issues a bare GET, the usual way to ask a random-image API for a pick.

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::agent::ImageAgent;
use crate::error::AppError;
use crate::sink::DeliverySink;

pub async fn run<S: DeliverySink>(
    agent: ImageAgent,
    sink: S,
    shutdown: CancellationToken,
) -> Result<(), AppError> {
    info!("console started — type a query and press Enter. Ctrl-C to quit.");
    println!("─────────────────────────────────");
    println!(" imgpick console  (Ctrl-C to quit)");
    println!("─────────────────────────────────");

    let stdin = tokio::io::stdin();
    let mut lines = BufReader::new(stdin).lines();

    loop {
        print!("> ");
        use std::io::Write as _;
        let _ = std::io::stdout().flush();

        tokio::select! {
            biased;

            _ = shutdown.cancelled() => {
                println!("\n[imgpick] shutdown signal received — closing console");
                info!("console shutting down");
                break;
            }

            line = lines.next_line() => {
                match line {
                    Err(e) => {
                        warn!("stdin read error: {e}");
                        break;
                    }
                    Ok(None) => {
                        info!("stdin closed");
                        break;
                    }
                    Ok(Some(input)) => {
                        debug!(input = %input.trim(), "console received line");
                        let message = agent.handle(&input).await;
                        if let Err(e) = sink.deliver(message) {
                            // One failed delivery must not take the loop down.
                            warn!("delivery failed: {e}");
                        }
                    }
                }
            }
        }
    }

    Ok(())
}
