//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Frame scheduling (requestAnimationFrame on web, manual ticks natively)
//! - Input events (window pointer listeners on web)
//! - Lifecycle: mount, unmount, spawn and clear triggers

#[cfg(target_arch = "wasm32")]
pub mod web;

use crate::Viewport;
use crate::renderer::{RenderSink, publish};
use crate::sim::{BodyId, FrameClock, PointerEvent, Simulation, StepReport, step};

/// Source of "next frame" callbacks
pub trait FrameScheduler {
    type Handle: Copy + std::fmt::Debug;

    /// Ask for one callback. `None` if the host refused.
    fn request_frame(&mut self) -> Option<Self::Handle>;

    fn cancel_frame(&mut self, handle: Self::Handle);

    /// The callback for `handle` is running now
    fn frame_fired(&mut self, _handle: Self::Handle) {}
}

/// Keeps exactly one frame request outstanding while mounted
pub struct FrameLoop<S: FrameScheduler> {
    scheduler: S,
    pending: Option<S::Handle>,
    clock: FrameClock,
    mounted: bool,
}

impl<S: FrameScheduler> FrameLoop<S> {
    pub fn new(scheduler: S) -> Self {
        Self {
            scheduler,
            pending: None,
            clock: FrameClock::new(),
            mounted: false,
        }
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    pub fn pending(&self) -> Option<S::Handle> {
        self.pending
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    pub fn mount(&mut self) {
        if self.mounted {
            return;
        }
        self.mounted = true;
        self.clock.reset();
        self.schedule();
    }

    pub fn unmount(&mut self) {
        if let Some(handle) = self.pending.take() {
            self.scheduler.cancel_frame(handle);
        }
        self.mounted = false;
        self.clock.reset();
    }

    /// Frame callback. Returns the step length to simulate, or `None` when
    /// the loop is not mounted (a stale callback).
    pub fn on_frame(&mut self, now_ms: f64, max_dt: f32) -> Option<f32> {
        if let Some(handle) = self.pending.take() {
            self.scheduler.frame_fired(handle);
        }
        if !self.mounted {
            return None;
        }
        let dt = self.clock.tick(now_ms, max_dt);
        self.schedule();
        Some(dt)
    }

    fn schedule(&mut self) {
        if self.pending.is_some() {
            return;
        }
        self.pending = self.scheduler.request_frame();
        if self.pending.is_none() {
            log::warn!("Frame request refused; loop stalled until next mount");
        }
    }
}

impl<S: FrameScheduler> Drop for FrameLoop<S> {
    fn drop(&mut self) {
        // A request left pending would fire into a freed callback
        self.unmount();
    }
}

/// Simulation, frame loop and render sink wired together
pub struct Host<S: FrameScheduler, R: RenderSink> {
    sim: Simulation,
    frame_loop: FrameLoop<S>,
    sink: R,
    frames: u64,
}

impl<S: FrameScheduler, R: RenderSink> Host<S, R> {
    pub fn new(sim: Simulation, scheduler: S, sink: R) -> Self {
        Self {
            sim,
            frame_loop: FrameLoop::new(scheduler),
            sink,
            frames: 0,
        }
    }

    pub fn sim(&self) -> &Simulation {
        &self.sim
    }

    pub fn sim_mut(&mut self) -> &mut Simulation {
        &mut self.sim
    }

    pub fn sink(&self) -> &R {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut R {
        &mut self.sink
    }

    pub fn frame_loop(&self) -> &FrameLoop<S> {
        &self.frame_loop
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        self.frame_loop.scheduler_mut()
    }

    /// Frames stepped since creation
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn mount(&mut self) {
        log::debug!("Mounting (seed {})", self.sim.seed);
        self.sink.sync_ids(&self.sim.live_ids());
        self.frame_loop.mount();
    }

    pub fn unmount(&mut self) {
        log::debug!("Unmounting after {} frames", self.frames);
        self.frame_loop.unmount();
    }

    /// Spawn trigger; publishes the new live-id sequence
    pub fn spawn(&mut self, viewport: Viewport, center_hint: Option<f32>) -> BodyId {
        let outcome = self.sim.spawn(viewport, center_hint);
        if !outcome.evicted.is_empty() {
            log::debug!("Evicted {:?} to admit {}", outcome.evicted, outcome.id);
        }
        self.sink.sync_ids(&self.sim.live_ids());
        publish(&self.sim, &mut self.sink);
        outcome.id
    }

    /// Clear trigger; always publishes an empty live-id sequence
    pub fn clear(&mut self) -> usize {
        let removed = self.sim.clear();
        self.sink.sync_ids(&[]);
        removed
    }

    /// Forward a raw pointer event; true if it started a grab
    pub fn pointer(&mut self, event: PointerEvent) -> bool {
        self.sim.pointer_event(event)
    }

    /// Frame callback: step once and publish transforms
    pub fn on_frame(&mut self, now_ms: f64, viewport: Viewport) -> Option<StepReport> {
        let dt = self.frame_loop.on_frame(now_ms, self.sim.tuning.max_dt)?;
        let report = step(&mut self.sim, viewport, dt);
        publish(&self.sim, &mut self.sink);
        self.frames += 1;
        Some(report)
    }
}

/// Scheduler driven by hand (native runner and tests)
#[derive(Debug, Default)]
pub struct ManualScheduler {
    next: u32,
    pending: Vec<u32>,
    pub requested: u32,
    pub cancelled: u32,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Outstanding requests
    pub fn pending(&self) -> &[u32] {
        &self.pending
    }
}

impl FrameScheduler for ManualScheduler {
    type Handle = u32;

    fn request_frame(&mut self) -> Option<u32> {
        self.next += 1;
        self.requested += 1;
        self.pending.push(self.next);
        Some(self.next)
    }

    fn cancel_frame(&mut self, handle: u32) {
        if let Some(idx) = self.pending.iter().position(|&h| h == handle) {
            self.pending.remove(idx);
            self.cancelled += 1;
        }
    }

    fn frame_fired(&mut self, handle: u32) {
        self.pending.retain(|&h| h != handle);
    }
}
