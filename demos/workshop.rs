//! # Example: workshop
//!
//! Runs the default workshop (4 vehicles per category, pools 4/2/1/1) with
//! control codes read line by line from stdin.
//!
//! ## Flow
//! ```text
//! stdin ──► CodeDecoder::pump() ──► StateHandle::apply_code()
//!                                          │
//! Simulation::builder(cfg).build() ────────┤
//!     ├─► Admission×12 ─► Q1 ─► mechanics ─► Q2 ─► cleaner ─► Q3 ─► deliverer
//!     └─► Bus ──► LogWriter (stdout) + ServiceTracker
//!
//! main: wait_completed() | Ctrl-C ──► shutdown()
//! ```
//!
//! ## Run
//! ```bash
//! # real time, state fixed at "normal"
//! cargo run --example workshop < /dev/null
//!
//! # 10x faster, mechanics serve only B from the start, then priority C
//! printf '2\n6\n' | cargo run --example workshop -- 0.1
//! ```
//! The optional argument scales every service time. Set `RUST_LOG=workshop=debug`
//! to see parks and requeues.

use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::EnvFilter;
use workshop::{CodeDecoder, Config, LogWriter, Simulation, Subscribe, shutdown_signal};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let mut cfg = Config::default();
    if let Some(arg) = std::env::args().nth(1) {
        let scale: f64 = arg
            .parse()
            .with_context(|| format!("invalid time scale {arg:?}"))?;
        cfg.service = cfg.service.scaled(scale);
        cfg.gate_backoff.first = cfg.gate_backoff.first.mul_f64(scale);
        cfg.gate_backoff.max = cfg.gate_backoff.max.mul_f64(scale);
    }

    let subs: Vec<Arc<dyn Subscribe>> = vec![Arc::new(LogWriter::new())];
    let sim = Simulation::builder(cfg)
        .with_subscribers(subs)
        .build()
        .context("invalid workshop configuration")?;

    let codes = sim.state().clone();
    let decoder = tokio::spawn(async move {
        CodeDecoder::new().pump(tokio::io::stdin(), &codes).await
    });

    tokio::select! {
        done = sim.wait_completed() => {
            println!("all {done} vehicles delivered in {:?}", sim.elapsed());
        }
        signal = shutdown_signal() => {
            let signal = signal.context("failed to listen for shutdown signals")?;
            println!(
                "{signal} received, {} of {} vehicles delivered",
                sim.tracker().completed(),
                sim.fleet_size()
            );
        }
    }

    decoder.abort();
    sim.shutdown().await;
    Ok(())
}
