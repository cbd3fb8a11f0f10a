//! Trail Animator
//!
//! Timer-driven frame loop. Pointer producers and the loop share only the
//! trail buffer; the loop runs until its sink asks to stop or the handle
//! is torn down.

use std::ops::ControlFlow;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use super::buffer::PointerTrail;
use super::ribbon::{compute_frame, Frame, RibbonStyle, Viewport};
use crate::config::TrailConfig;

/// Consumer of computed frames
pub trait FrameSink: Send + 'static {
    /// Draw or forward a frame. `Break` ends the loop.
    fn present(&mut self, frame: &Frame) -> Result<ControlFlow<()>>;
}

/// Cloneable handle used to feed pointer and resize events
#[derive(Debug, Clone)]
pub struct TrailInput {
    trail: Arc<Mutex<PointerTrail>>,
    viewport: Arc<Mutex<Viewport>>,
}

impl TrailInput {
    /// Record a pointer position given in client (CSS pixel) coordinates
    pub async fn pointer_moved(&self, x: f64, y: f64) {
        let point = self.viewport.lock().await.to_device(x, y);
        self.trail.lock().await.push(point);
    }

    /// Resize the drawing surface
    pub async fn resized(&self, css_width: f64, css_height: f64) {
        let mut viewport = self.viewport.lock().await;
        *viewport = Viewport::new(css_width, css_height, viewport.device_pixel_ratio);
    }

    pub async fn sample_count(&self) -> usize {
        self.trail.lock().await.len()
    }
}

/// Frame loop configuration and shared state, before it is started
pub struct TrailAnimator {
    input: TrailInput,
    style: RibbonStyle,
    period: std::time::Duration,
}

impl TrailAnimator {
    pub fn new(config: &TrailConfig) -> Self {
        let viewport = Viewport::new(config.width, config.height, config.device_pixel_ratio);
        Self {
            input: TrailInput {
                trail: Arc::new(Mutex::new(PointerTrail::new(config.capacity))),
                viewport: Arc::new(Mutex::new(viewport)),
            },
            style: config.style,
            period: config.frame_period(),
        }
    }

    pub fn input(&self) -> TrailInput {
        self.input.clone()
    }

    /// Start the frame loop on the current runtime
    pub fn spawn<S: FrameSink>(self, mut sink: S) -> RunningTrail {
        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
        let TrailAnimator {
            input,
            style,
            period,
        } = self;

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            let mut time = 0.0;
            let mut frames = 0usize;

            loop {
                tokio::select! {
                    _ = shutdown_rx.changed() => break,
                    _ = ticker.tick() => {
                        time += style.time_step;
                        let points = input.trail.lock().await.snapshot();
                        let viewport = *input.viewport.lock().await;
                        let frame = compute_frame(&points, time, &viewport, &style);
                        frames += 1;

                        match sink.present(&frame) {
                            Ok(ControlFlow::Continue(())) => {}
                            Ok(ControlFlow::Break(())) => break,
                            Err(e) => {
                                log::warn!("Frame sink failed, stopping trail: {:#}", e);
                                break;
                            }
                        }
                    }
                }
            }

            log::debug!("Trail loop stopped after {} frames", frames);
        });

        RunningTrail { shutdown_tx, task }
    }
}

/// A started frame loop
pub struct RunningTrail {
    shutdown_tx: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl RunningTrail {
    /// Signal teardown and wait for the loop to exit
    pub async fn stop(self) -> Result<()> {
        // The loop may already be gone if the sink ended it
        let _ = self.shutdown_tx.send(true);
        self.task.await.context("trail loop panicked")
    }

    /// Wait for the sink to end the loop on its own
    pub async fn finished(self) -> Result<()> {
        let RunningTrail { shutdown_tx, task } = self;
        let result = task.await.context("trail loop panicked");
        drop(shutdown_tx);
        result
    }
}
