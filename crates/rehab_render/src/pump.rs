//! The frame pump
//!
//! Runs the paint loop on its own thread:
//! 1. Swap to the other buffer and clear it
//! 2. Snapshot every drawable in the painted layers, then paint the snapshots
//! 3. Move drawables waiting in the intake queue into the layers
//! 4. Present the buffer
//! 5. Sleep out the rest of the frame interval

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender};
use rehab_core::{DrawSnapshot, Drawable, InstanceRegistry, Surface, CLEAR_GREY};

use crate::buffers::BufferPair;
use crate::error::RenderError;
use crate::layers::{LayerManager, LayerMask, LayerPolicy};
use crate::pacing::{FramePacer, OverrunPolicy};

/// Receives every finished frame
pub trait Presenter: Send {
    fn present(&mut self, frame: &Surface);
}

impl<F: FnMut(&Surface) + Send> Presenter for F {
    fn present(&mut self, frame: &Surface) {
        self(frame)
    }
}

/// Frame pump settings
#[derive(Clone, Debug)]
pub struct PumpConfig {
    /// Target frames per second
    pub fps: u32,
    /// Surface width in pixels
    pub width: u32,
    /// Surface height in pixels
    pub height: u32,
    /// Number of compositing layers
    pub layer_count: usize,
    /// ARGB fill for each new frame
    pub clear_color: u32,
    /// Layers that get painted
    pub paint_layers: LayerMask,
    /// Behaviour when a frame runs long
    pub overrun: OverrunPolicy,
}

impl Default for PumpConfig {
    fn default() -> Self {
        Self {
            fps: 60,
            width: 720,
            height: 480,
            layer_count: 3,
            clear_color: CLEAR_GREY,
            paint_layers: LayerMask::BASE,
            overrun: OverrunPolicy::CatchUp,
        }
    }
}

/// What happened in one frame
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameReport {
    /// Frame number, starting at 0
    pub frame: u64,
    /// Index of the buffer painted and presented
    pub buffer: usize,
    /// Drawables painted
    pub painted: usize,
    /// Drawables moved in from the intake queue
    pub admitted: usize,
}

struct PumpState {
    running: AtomicBool,
    stop_requested: AtomicBool,
    frames: AtomicU64,
}

/// Cloneable handle for talking to a frame pump from other threads
#[derive(Clone)]
pub struct FrameHandle {
    intake: Sender<Arc<dyn Drawable>>,
    wake: Sender<()>,
    state: Arc<PumpState>,
}

impl FrameHandle {
    /// Queue a drawable created after layers were loaded
    ///
    /// It shows up from the frame after the one that picks it up.
    pub fn add_drawable(&self, drawable: Arc<dyn Drawable>) {
        if self.intake.send(drawable).is_err() {
            log::warn!("Frame pump is gone; dropping new drawable");
        }
    }

    /// Whether the pump loop is currently running
    pub fn is_running(&self) -> bool {
        self.state.running.load(Ordering::Acquire)
    }

    /// Frames presented so far
    pub fn frames_presented(&self) -> u64 {
        self.state.frames.load(Ordering::Relaxed)
    }

    /// Ask the pump to leave its loop at the next frame boundary
    pub fn stop(&self) {
        self.state.stop_requested.store(true, Ordering::Release);
        let _ = self.wake.try_send(());
    }

    pub fn stop_requested(&self) -> bool {
        self.state.stop_requested.load(Ordering::Acquire)
    }
}

#[derive(Default)]
struct FrameStats {
    window_start: Option<Instant>,
    frames: u32,
    busy: Duration,
    overruns: u32,
}

impl FrameStats {
    fn record(&mut self, elapsed: Duration, overrun: bool) {
        let now = Instant::now();
        let start = *self.window_start.get_or_insert(now);
        self.frames += 1;
        self.busy += elapsed;
        if overrun {
            self.overruns += 1;
        }

        let window = now - start;
        if window >= Duration::from_secs(1) {
            log::debug!(
                "{} frames in {:.2?} ({:.1} fps), avg body {:.2?}, {} overruns",
                self.frames,
                window,
                self.frames as f64 / window.as_secs_f64(),
                self.busy / self.frames,
                self.overruns
            );
            *self = Self::default();
            self.window_start = Some(now);
        }
    }
}

/// Double-buffered, layer-ordered, self-paced paint loop
pub struct FramePump<P: Presenter> {
    config: PumpConfig,
    layers: LayerManager,
    buffers: BufferPair,
    pacer: FramePacer,
    presenter: P,
    intake: Receiver<Arc<dyn Drawable>>,
    wake: Receiver<()>,
    handle: FrameHandle,
    snapshots: Vec<DrawSnapshot>,
    frame: u64,
}

impl<P: Presenter> FramePump<P> {
    /// Create a pump with default settings and the given frame rate
    pub fn new(fps: u32, presenter: P) -> Result<Self, RenderError> {
        Self::with_config(
            PumpConfig {
                fps,
                ..PumpConfig::default()
            },
            presenter,
        )
    }

    pub fn with_config(config: PumpConfig, presenter: P) -> Result<Self, RenderError> {
        let pacer = FramePacer::from_fps(config.fps, config.overrun)?;
        let layers = LayerManager::new(config.layer_count)?;
        let buffers = BufferPair::new(config.width, config.height);

        let (intake_tx, intake_rx) = crossbeam_channel::unbounded();
        let (wake_tx, wake_rx) = crossbeam_channel::bounded(1);
        let handle = FrameHandle {
            intake: intake_tx,
            wake: wake_tx,
            state: Arc::new(PumpState {
                running: AtomicBool::new(false),
                stop_requested: AtomicBool::new(false),
                frames: AtomicU64::new(0),
            }),
        };

        log::info!(
            "Frame pump: {}x{} @ {} fps ({:?} interval), {} layers, painting {:?}",
            config.width,
            config.height,
            config.fps,
            pacer.interval(),
            config.layer_count,
            config.paint_layers
        );

        Ok(Self {
            config,
            layers,
            buffers,
            pacer,
            presenter,
            intake: intake_rx,
            wake: wake_rx,
            handle,
            snapshots: Vec::new(),
            frame: 0,
        })
    }

    /// Replace the layer assignment policy
    pub fn with_layer_policy<L: LayerPolicy + 'static>(mut self, policy: L) -> Self {
        self.layers.set_policy(policy);
        self
    }

    /// Load every drawable the registry knows about into the layers
    ///
    /// Call before starting the loop; later arrivals go through
    /// [`FrameHandle::add_drawable`].
    pub fn reload_layers(&mut self, registry: &dyn InstanceRegistry) -> usize {
        let drawables = registry.loaded_drawables();
        let count = drawables.len();
        for drawable in drawables {
            self.layers.add(drawable);
        }
        log::info!("Loaded {} drawables into {} layers", count, self.layers.layer_count());
        count
    }

    /// A new handle to this pump
    pub fn handle(&self) -> FrameHandle {
        self.handle.clone()
    }

    pub fn layers(&self) -> &LayerManager {
        &self.layers
    }

    pub fn layers_mut(&mut self) -> &mut LayerManager {
        &mut self.layers
    }

    pub fn buffers(&self) -> &BufferPair {
        &self.buffers
    }

    pub fn pacer(&self) -> &FramePacer {
        &self.pacer
    }

    pub fn config(&self) -> &PumpConfig {
        &self.config
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    /// Paint and present one frame, without pacing
    pub fn render_frame(&mut self) -> FrameReport {
        let buffer = self.buffers.swap();
        let clear_color = self.config.clear_color;
        self.buffers.selected_mut().fill(clear_color);

        // Read every position before painting so no entity lock is held while
        // pixels are written
        self.snapshots.clear();
        self.snapshots.extend(
            self.layers
                .painted(self.config.paint_layers)
                .map(|drawable| drawable.snapshot()),
        );

        let surface = self.buffers.selected_mut();
        let height = surface.height() as f64;
        for snap in &self.snapshots {
            // Physics is Y-up, pixels are Y-down
            snap.sprite.draw(surface, snap.x as i32, (height - snap.y) as i32);
        }

        let mut admitted = 0;
        for drawable in self.intake.try_iter() {
            self.layers.add(drawable);
            admitted += 1;
        }

        self.presenter.present(self.buffers.selected());

        let report = FrameReport {
            frame: self.frame,
            buffer,
            painted: self.snapshots.len(),
            admitted,
        };
        self.frame += 1;
        self.handle.state.frames.fetch_add(1, Ordering::Relaxed);
        log::trace!("{:?}", report);
        report
    }

    /// Run frames until a stop is requested, then hand the presenter back
    pub fn run(mut self) -> P {
        let state = Arc::clone(&self.handle.state);
        state.running.store(true, Ordering::Release);
        log::info!("Frame pump running");

        let mut stats = FrameStats::default();
        while !state.stop_requested.load(Ordering::Acquire) {
            let frame_start = Instant::now();
            self.render_frame();

            let elapsed = frame_start.elapsed();
            let delay = self.pacer.delay_for(elapsed);
            stats.record(elapsed, elapsed > self.pacer.interval());
            if let Some(delay) = delay {
                self.pace(delay);
            }
        }

        state.running.store(false, Ordering::Release);
        log::info!("Frame pump stopped after {} frames", self.frame);
        self.presenter
    }

    fn pace(&self, delay: Duration) {
        match self.wake.recv_timeout(delay) {
            Err(RecvTimeoutError::Timeout) => {}
            Ok(()) => log::debug!("Frame pacing sleep interrupted; continuing"),
            // The pump keeps its own handle, so the sender cannot vanish;
            // fall back to a plain sleep all the same
            Err(RecvTimeoutError::Disconnected) => thread::sleep(delay),
        }
    }
}

impl<P: Presenter + 'static> FramePump<P> {
    /// Start [`FramePump::run`] on a thread named `frame-pump`
    pub fn spawn(self) -> Result<JoinHandle<P>, RenderError> {
        let handle = thread::Builder::new()
            .name("frame-pump".to_string())
            .spawn(move || self.run())?;
        Ok(handle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rehab_core::{SolidSprite, Sprite};
    use std::sync::Mutex;

    const RED: u32 = 0xFFFF_0000;

    struct Block {
        at: (f64, f64),
        hint: Option<usize>,
        color: u32,
    }

    impl Drawable for Block {
        fn position(&self) -> (f64, f64) {
            self.at
        }

        fn sprite(&self) -> Arc<dyn Sprite> {
            Arc::new(SolidSprite::new(2, 2, self.color))
        }

        fn layer_hint(&self) -> Option<usize> {
            self.hint
        }
    }

    fn block(x: f64, y: f64, hint: Option<usize>, color: u32) -> Arc<dyn Drawable> {
        Arc::new(Block {
            at: (x, y),
            hint,
            color,
        })
    }

    struct Registry(Vec<Arc<dyn Drawable>>);

    impl InstanceRegistry for Registry {
        fn loaded_drawables(&self) -> Vec<Arc<dyn Drawable>> {
            self.0.clone()
        }
    }

    fn small_config() -> PumpConfig {
        PumpConfig {
            fps: 1000,
            width: 16,
            height: 16,
            ..PumpConfig::default()
        }
    }

    fn recording() -> (Arc<Mutex<Vec<Surface>>>, impl FnMut(&Surface) + Send) {
        let frames = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&frames);
        (frames, move |s: &Surface| sink.lock().unwrap().push(s.clone()))
    }

    #[test]
    fn test_zero_fps_rejected() {
        let result = FramePump::new(0, |_: &Surface| {});
        assert!(matches!(result, Err(RenderError::InvalidFrameRate(0))));
    }

    #[test]
    fn test_buffers_alternate_across_frames() {
        let mut pump = FramePump::with_config(small_config(), |_: &Surface| {}).unwrap();
        let mut last = None;
        for n in 0..8 {
            let report = pump.render_frame();
            assert_eq!(report.frame, n);
            assert_ne!(Some(report.buffer), last);
            last = Some(report.buffer);
        }
        assert_eq!(pump.handle().frames_presented(), 8);
    }

    #[test]
    fn test_clears_to_dark_grey() {
        let (frames, presenter) = recording();
        let mut pump = FramePump::with_config(small_config(), presenter).unwrap();
        pump.render_frame();
        let frames = frames.lock().unwrap();
        assert_eq!(frames[0].count_not(CLEAR_GREY), 0);
    }

    #[test]
    fn test_paints_with_y_flip() {
        let (frames, presenter) = recording();
        let mut pump = FramePump::with_config(small_config(), presenter).unwrap();
        pump.layers_mut().add(block(3.0, 10.0, None, RED));

        let report = pump.render_frame();
        assert_eq!(report.painted, 1);

        let frames = frames.lock().unwrap();
        // Top-left lands at (3, 16 - 10)
        assert_eq!(frames[0].argb_at(3, 6), Some(RED));
        assert_eq!(frames[0].argb_at(4, 7), Some(RED));
        assert_eq!(frames[0].argb_at(3, 5), Some(CLEAR_GREY));
        assert_eq!(frames[0].count_not(CLEAR_GREY), 4);
    }

    #[test]
    fn test_only_base_layer_painted_by_default() {
        let (frames, presenter) = recording();
        let mut pump = FramePump::with_config(small_config(), presenter).unwrap();
        pump.layers_mut().add(block(0.0, 16.0, Some(1), RED));
        pump.layers_mut().add(block(4.0, 16.0, Some(2), RED));

        for _ in 0..3 {
            assert_eq!(pump.render_frame().painted, 0);
        }
        let frames = frames.lock().unwrap();
        assert!(frames.iter().all(|f| f.count_not(CLEAR_GREY) == 0));
    }

    #[test]
    fn test_all_layers_painted_back_to_front() {
        let config = PumpConfig {
            paint_layers: LayerMask::first(3),
            ..small_config()
        };
        let (frames, presenter) = recording();
        let mut pump = FramePump::with_config(config, presenter).unwrap();
        // Same spot: the layer 2 block must win regardless of insertion order
        pump.layers_mut().add(block(0.0, 16.0, Some(2), RED));
        pump.layers_mut().add(block(0.0, 16.0, Some(0), 0xFF00_FF00));

        assert_eq!(pump.render_frame().painted, 2);
        assert_eq!(frames.lock().unwrap()[0].argb_at(0, 0), Some(RED));
    }

    #[test]
    fn test_intake_visible_next_frame() {
        let (frames, presenter) = recording();
        let mut pump = FramePump::with_config(small_config(), presenter).unwrap();
        let handle = pump.handle();
        handle.add_drawable(block(0.0, 16.0, None, RED));

        let first = pump.render_frame();
        assert_eq!(first.painted, 0);
        assert_eq!(first.admitted, 1);

        let second = pump.render_frame();
        assert_eq!(second.painted, 1);
        assert_eq!(second.admitted, 0, "queue is drained, not re-read");
        assert_eq!(pump.layers().len(), 1);

        let frames = frames.lock().unwrap();
        assert_eq!(frames[0].count_not(CLEAR_GREY), 0);
        assert_eq!(frames[1].argb_at(0, 0), Some(RED));
    }

    #[test]
    fn test_reload_layers_from_registry() {
        let mut pump = FramePump::with_config(small_config(), |_: &Surface| {}).unwrap();
        let registry = Registry(vec![
            block(0.0, 16.0, None, RED),
            block(8.0, 16.0, Some(1), RED),
        ]);
        assert_eq!(pump.reload_layers(&registry), 2);
        assert_eq!(pump.layers().layer(0).unwrap().len(), 1);
        assert_eq!(pump.layers().layer(1).unwrap().len(), 1);
    }

    #[test]
    fn test_run_until_stopped() {
        let mut pump = FramePump::with_config(small_config(), |_: &Surface| {}).unwrap();
        pump.layers_mut().add(block(0.0, 16.0, None, RED));
        let handle = pump.handle();
        assert!(!handle.is_running());

        let thread = pump.spawn().unwrap();
        while handle.frames_presented() < 3 {
            thread::yield_now();
        }
        assert!(handle.is_running());
        handle.stop();
        let _presenter = thread.join().unwrap();

        assert!(!handle.is_running());
        assert!(handle.stop_requested());
        assert!(handle.frames_presented() >= 3);
    }

    #[test]
    fn test_stop_interrupts_long_sleep() {
        let config = PumpConfig {
            fps: 1,
            ..small_config()
        };
        let pump = FramePump::with_config(config, |_: &Surface| {}).unwrap();
        let handle = pump.handle();
        let thread = pump.spawn().unwrap();
        while handle.frames_presented() < 1 {
            thread::yield_now();
        }

        let start = Instant::now();
        handle.stop();
        let _presenter = thread.join().unwrap();
        assert!(start.elapsed() < Duration::from_millis(900));
        assert_eq!(handle.frames_presented(), 1);
    }

    #[test]
    fn test_add_after_pump_dropped_does_not_panic() {
        let pump = FramePump::with_config(small_config(), |_: &Surface| {}).unwrap();
        let handle = pump.handle();
        drop(pump);
        handle.add_drawable(block(0.0, 0.0, None, RED));
    }
}
