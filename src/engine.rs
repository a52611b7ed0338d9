use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::Result;
use log::{debug, error, info, warn};
use rand::Rng;
use rand::rngs::ThreadRng;

use crate::constants::{MAX_TICKS_PER_FRAME, RETRY_DELAY};
use crate::cover::cover_fit;
use crate::deck::Deck;
use crate::error::StartupError;
use crate::monitor::Monitor;
use crate::state::{Scheduled, SlideshowState, Timing, tick};
use crate::surface::{Key, PointerButton, Surface, SurfaceEvent};
use crate::texture_loader::load_image_with_exif_rotation;

/// Drives the fade / hold / advance cycle on a single surface.
///
/// Everything runs on the caller's thread: `update` is called once per frame
/// and fires whatever timer ticks have come due since the previous frame.
pub struct Engine<S: Surface, R: Rng = ThreadRng> {
    surface: S,
    deck: Deck<PathBuf>,
    width: u32,
    height: u32,
    timing: Timing,
    rng: R,

    state: SlideshowState,
    pending: Option<Scheduled>,
    current: Option<PathBuf>,
    failures: usize,
    /// Set when a frame spent time decoding and uploading an image.
    loaded: bool,
}

impl<S: Surface> Engine<S> {
    pub fn new(surface: S, monitor: &Monitor, images: Vec<PathBuf>, timing: Timing) -> Result<Self, StartupError> {
        Self::with_rng(surface, monitor, images, timing, rand::rng())
    }
}

impl<S: Surface, R: Rng> Engine<S, R> {
    pub fn with_rng(
        mut surface: S,
        monitor: &Monitor,
        images: Vec<PathBuf>,
        timing: Timing,
        rng: R,
    ) -> Result<Self, StartupError> {
        let deck = Deck::new(images);
        if deck.is_empty() {
            return Err(StartupError::EmptyDeck);
        }

        // Move onto the target monitor before going fullscreen there
        surface.set_position(monitor.x, monitor.y);
        surface.set_size(monitor.width, monitor.height);
        surface.set_fullscreen(true);

        Ok(Self {
            surface,
            deck,
            width: monitor.width,
            height: monitor.height,
            timing,
            rng,
            state: SlideshowState::Idle,
            pending: None,
            current: None,
            failures: 0,
            loaded: false,
        })
    }

    pub fn is_closed(&self) -> bool {
        self.state == SlideshowState::Closed
    }

    /// Binds the quit inputs and schedules the first image.
    pub fn start(&mut self) {
        if self.state != SlideshowState::Idle || self.pending.is_some() {
            return;
        }
        self.surface.bind_key(Key::Escape);
        self.surface.bind_click(PointerButton::Primary);
        self.pending = Some(Scheduled {
            state: SlideshowState::Idle,
            step: 0,
            delay: Duration::ZERO,
        });
        info!("Starting slideshow with {} image(s) at {}x{}", self.deck.len(), self.width, self.height);
    }

    /// Runs until a quit event arrives.
    pub fn run(&mut self) {
        self.start();
        let mut last_frame = Instant::now();
        while !self.is_closed() {
            self.run_frame(&mut last_frame);
        }
    }

    /// Wall-clock frame. Time spent loading an image does not count towards
    /// the fade that follows it.
    fn run_frame(&mut self, last_frame: &mut Instant) {
        let now = Instant::now();
        let dt = if std::mem::take(&mut self.loaded) {
            Duration::ZERO
        } else {
            now - *last_frame
        };
        *last_frame = now;
        self.update(dt);
    }

    /// One frame: handle input, fire due ticks, draw.
    pub fn update(&mut self, dt: Duration) {
        if self.is_closed() {
            return;
        }

        if let Some(event) = self.surface.poll() {
            match event {
                SurfaceEvent::KeyPressed(key) => info!("{:?} pressed, closing", key),
                SurfaceEvent::Clicked(button) => info!("{:?} button clicked, closing", button),
                SurfaceEvent::CloseRequested => info!("Window close requested"),
            }
            self.quit();
            return;
        }

        self.advance_timer(dt);
        self.surface.present();
    }

    pub fn quit(&mut self) {
        if self.is_closed() {
            return;
        }
        if let Some(path) = &self.current {
            debug!("Closing while showing {}", path.display());
        }
        self.state = SlideshowState::Closed;
        self.pending = None;
        self.surface.close();
    }

    fn advance_timer(&mut self, dt: Duration) {
        let mut budget = dt;
        self.loaded = false;
        for _ in 0..MAX_TICKS_PER_FRAME {
            let Some(pending) = self.pending.as_mut() else {
                return;
            };
            if pending.delay > budget {
                pending.delay -= budget;
                return;
            }
            budget -= pending.delay;

            let due = *pending;
            self.pending = None;
            self.fire(due.state, due.step);

            // Only zero-delay ticks may follow a load in the same frame
            if self.loaded {
                budget = Duration::ZERO;
            }
        }
        // A stalled frame drops the rest of its time instead of replaying it
        debug!("Tick budget exhausted for this frame, {:?} left over", budget);
    }

    fn fire(&mut self, state: SlideshowState, step: u32) {
        if self.is_closed() {
            return;
        }

        let tick = tick(state, step, &self.timing);
        self.state = state;

        if tick.load_next {
            self.loaded = true;
        }
        if tick.load_next && !self.show_next_image() {
            // Try the next deck entry later rather than recursing right away
            self.pending = Some(Scheduled {
                state,
                step,
                delay: self.retry_delay(),
            });
            return;
        }

        if let Some(opacity) = tick.opacity {
            self.surface.set_opacity(opacity);
        }
        self.pending = tick.next;
    }

    fn retry_delay(&self) -> Duration {
        if self.failures >= self.deck.len() {
            self.timing.view_time
        } else {
            RETRY_DELAY
        }
    }

    fn show_next_image(&mut self) -> bool {
        let Some(path) = self.deck.draw(&mut self.rng) else {
            return false;
        };
        let name = path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();

        match self.render(&path) {
            Ok(()) => {
                info!("Displaying: {}", name);
                debug!("{} image(s) left before reshuffle", self.deck.remaining());
                self.failures = 0;
                self.current = Some(path);
                true
            }
            Err(e) => {
                warn!("Could not load image {}: {:#}", name, e);
                self.failures += 1;
                if self.failures % self.deck.len() == 0 {
                    error!(
                        "None of the {} image(s) could be displayed, retrying every {:?}",
                        self.deck.len(),
                        self.timing.view_time
                    );
                }
                false
            }
        }
    }

    fn render(&mut self, path: &Path) -> Result<()> {
        let image = load_image_with_exif_rotation(path)?;
        let frame = cover_fit(&image, self.width, self.height, &mut self.rng);
        self.surface.set_image(&frame)
    }
}
