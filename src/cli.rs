//! Command dispatch for the `cardform` binary.

use std::io::{BufRead, Write};
use std::ops::ControlFlow;

use anyhow::{Context, Result};
use serde::Deserialize;
use tokio::sync::mpsc;

use crate::config::{Command, Config, TrailConfig};
use crate::form::{Field, FormEngine, FormState};
use crate::server::serve_stdio;
use crate::trail::{Frame, FrameSink, TrailAnimator};

/// Run the configured command. Returns the process exit code.
pub async fn run(config: Config) -> Result<i32> {
    let registry = config.load_registry()?;
    log::debug!("{} card types available", registry.len());
    let engine = FormEngine::new(registry);

    match config.command {
        Command::Serve => {
            serve_stdio(engine).await?;
            Ok(0)
        }
        Command::Check {
            number,
            expiry,
            cvv,
            name,
        } => {
            let state = check(&engine, &number, &expiry, &cvv, &name);
            let mut stdout = std::io::stdout().lock();
            serde_json::to_writer_pretty(&mut stdout, &state)?;
            writeln!(stdout)?;
            Ok(if state.can_submit { 0 } else { 1 })
        }
        Command::Trail { frames } => {
            run_trail(&config.trail, frames).await?;
            Ok(0)
        }
    }
}

/// Feed a complete set of values through the reducer, number first so the
/// security code is clamped against the detected issuer.
pub fn check(engine: &FormEngine, number: &str, expiry: &str, cvv: &str, name: &str) -> FormState {
    [
        (Field::Number, number),
        (Field::Expiry, expiry),
        (Field::Cvv, cvv),
        (Field::HolderName, name),
    ]
    .into_iter()
    .fold(engine.reset(), |state, (field, value)| {
        engine.on_field_change(&state, field, value)
    })
}

/// Pointer sample as read from stdin, in CSS pixels
#[derive(Debug, Deserialize)]
struct PointerSample {
    x: f64,
    y: f64,
}

/// Writes each frame as one JSON line, stopping after a fixed count
pub struct JsonLinesSink<W> {
    writer: W,
    remaining: usize,
}

impl<W: Write> JsonLinesSink<W> {
    pub fn new(writer: W, frames: usize) -> Self {
        Self {
            writer,
            remaining: frames,
        }
    }
}

impl<W: Write + Send + 'static> FrameSink for JsonLinesSink<W> {
    fn present(&mut self, frame: &Frame) -> Result<ControlFlow<()>> {
        if self.remaining == 0 {
            return Ok(ControlFlow::Break(()));
        }

        serde_json::to_writer(&mut self.writer, frame)?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;

        self.remaining -= 1;
        Ok(if self.remaining == 0 {
            ControlFlow::Break(())
        } else {
            ControlFlow::Continue(())
        })
    }
}

async fn run_trail(config: &TrailConfig, frames: usize) -> Result<()> {
    if frames == 0 {
        return Ok(());
    }

    let animator = TrailAnimator::new(config);
    let input = animator.input();

    // A plain thread, so a stdin that never closes cannot hold up runtime shutdown
    let (tx, mut rx) = mpsc::unbounded_channel::<PointerSample>();
    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            match serde_json::from_str(&line) {
                Ok(sample) => {
                    if tx.send(sample).is_err() {
                        break;
                    }
                }
                Err(e) => log::warn!("Ignoring pointer sample {:?}: {}", line, e),
            }
        }
    });

    let feeder = tokio::spawn(async move {
        while let Some(sample) = rx.recv().await {
            input.pointer_moved(sample.x, sample.y).await;
        }
    });

    let running = animator.spawn(JsonLinesSink::new(std::io::stdout(), frames));
    let result = running.finished().await.context("trail animation failed");
    feeder.abort();
    result
}
