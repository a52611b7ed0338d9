use std::time::Duration;

use crate::constants::{FADE_DURATION, FADE_STEPS, VIEW_TIME};

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum SlideshowState {
    Idle,       // Nothing shown yet
    Displaying, // Holding the current image at full opacity
    FadingOut,  // Opacity ramping 1 -> 0
    Advance,    // Swapping in the next image while invisible
    FadingIn,   // Opacity ramping 0 -> 1
    Closed,     // Quit requested, nothing runs anymore
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Timing {
    pub view_time: Duration,
    pub fade_duration: Duration,
    pub fade_steps: u32,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            view_time: VIEW_TIME,
            fade_duration: FADE_DURATION,
            fade_steps: FADE_STEPS,
        }
    }
}

impl Timing {
    pub fn step_delay(&self) -> Duration {
        self.fade_duration / self.fade_steps.max(1)
    }

    fn steps(&self) -> u32 {
        self.fade_steps.max(1)
    }

    pub fn fade_out_opacity(&self, step: u32) -> f32 {
        let steps = self.steps();
        (steps - step.min(steps)) as f32 / steps as f32
    }

    pub fn fade_in_opacity(&self, step: u32) -> f32 {
        let steps = self.steps();
        step.min(steps) as f32 / steps as f32
    }
}

/// A tick waiting on the timer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scheduled {
    pub state: SlideshowState,
    pub step: u32,
    pub delay: Duration,
}

/// What one tick asks the engine to do, and what to run after it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tick {
    pub load_next: bool,
    pub opacity: Option<f32>,
    pub next: Option<Scheduled>,
}

fn after(state: SlideshowState, step: u32, delay: Duration) -> Option<Scheduled> {
    Some(Scheduled { state, step, delay })
}

/// Transition table of the slideshow.
///
/// `Idle` loads the first image at full opacity, `Displaying` holds it for the
/// view time, `FadingOut` and `FadingIn` walk `fade_steps + 1` opacity samples,
/// and `Advance` swaps the image while it is invisible. `Closed` never schedules
/// anything again.
pub fn tick(state: SlideshowState, step: u32, timing: &Timing) -> Tick {
    let steps = timing.steps();
    match state {
        SlideshowState::Idle => Tick {
            load_next: true,
            opacity: Some(1.0),
            next: after(SlideshowState::Displaying, 0, Duration::ZERO),
        },
        SlideshowState::Displaying => Tick {
            load_next: false,
            opacity: None,
            next: after(SlideshowState::FadingOut, 0, timing.view_time),
        },
        SlideshowState::FadingOut => Tick {
            load_next: false,
            opacity: Some(timing.fade_out_opacity(step)),
            next: if step < steps {
                after(SlideshowState::FadingOut, step + 1, timing.step_delay())
            } else {
                after(SlideshowState::Advance, 0, Duration::ZERO)
            },
        },
        SlideshowState::Advance => Tick {
            load_next: true,
            opacity: None,
            next: after(SlideshowState::FadingIn, 0, Duration::ZERO),
        },
        SlideshowState::FadingIn => Tick {
            load_next: false,
            opacity: Some(timing.fade_in_opacity(step)),
            next: if step < steps {
                after(SlideshowState::FadingIn, step + 1, timing.step_delay())
            } else {
                after(SlideshowState::Displaying, 0, Duration::ZERO)
            },
        },
        SlideshowState::Closed => Tick {
            load_next: false,
            opacity: None,
            next: None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp(state: SlideshowState, timing: &Timing) -> Vec<f32> {
        let mut samples = Vec::new();
        let mut step = 0;
        loop {
            let t = tick(state, step, timing);
            samples.push(t.opacity.unwrap());
            match t.next {
                Some(next) if next.state == state => step = next.step,
                _ => break,
            }
        }
        samples
    }

    #[test]
    fn default_timing_matches_constants() {
        let timing = Timing::default();
        assert_eq!(timing.view_time, Duration::from_secs(5));
        assert_eq!(timing.step_delay(), Duration::from_secs(2) / 90);
    }

    #[test]
    fn fade_out_ramp_is_non_increasing() {
        let timing = Timing::default();
        let samples = ramp(SlideshowState::FadingOut, &timing);

        assert_eq!(samples.len(), FADE_STEPS as usize + 1);
        assert_eq!(samples[0], 1.0);
        assert_eq!(*samples.last().unwrap(), 0.0);
        assert!(samples.windows(2).all(|w| w[1] <= w[0]));
    }

    #[test]
    fn fade_in_ramp_mirrors_fade_out() {
        let timing = Timing { fade_steps: 4, ..Timing::default() };
        let fade_in = ramp(SlideshowState::FadingIn, &timing);
        let fade_out = ramp(SlideshowState::FadingOut, &timing);

        assert_eq!(fade_in, vec![0.0, 0.25, 0.5, 0.75, 1.0]);
        assert!(fade_in.windows(2).all(|w| w[1] >= w[0]));
        let mirrored: Vec<f32> = fade_out.iter().rev().copied().collect();
        assert_eq!(fade_in, mirrored);
    }

    #[test]
    fn fade_steps_use_the_per_step_delay() {
        let timing = Timing {
            view_time: Duration::from_secs(5),
            fade_duration: Duration::from_millis(400),
            fade_steps: 4,
        };
        let next = tick(SlideshowState::FadingOut, 1, &timing).next.unwrap();
        assert_eq!(next, Scheduled { state: SlideshowState::FadingOut, step: 2, delay: Duration::from_millis(100) });
    }

    #[test]
    fn full_cycle_transition_table() {
        let timing = Timing { fade_steps: 2, ..Timing::default() };

        let start = tick(SlideshowState::Idle, 0, &timing);
        assert!(start.load_next);
        assert_eq!(start.opacity, Some(1.0));
        assert_eq!(start.next.unwrap().state, SlideshowState::Displaying);

        let hold = tick(SlideshowState::Displaying, 0, &timing);
        assert!(!hold.load_next);
        assert_eq!(hold.next, Some(Scheduled { state: SlideshowState::FadingOut, step: 0, delay: timing.view_time }));

        // Last fade-out step hands over to Advance immediately
        let last_out = tick(SlideshowState::FadingOut, 2, &timing);
        assert_eq!(last_out.opacity, Some(0.0));
        assert_eq!(last_out.next, Some(Scheduled { state: SlideshowState::Advance, step: 0, delay: Duration::ZERO }));

        let advance = tick(SlideshowState::Advance, 0, &timing);
        assert!(advance.load_next);
        assert_eq!(advance.next.unwrap().state, SlideshowState::FadingIn);

        let last_in = tick(SlideshowState::FadingIn, 2, &timing);
        assert_eq!(last_in.opacity, Some(1.0));
        assert_eq!(last_in.next, Some(Scheduled { state: SlideshowState::Displaying, step: 0, delay: Duration::ZERO }));
    }

    #[test]
    fn closed_is_terminal() {
        let t = tick(SlideshowState::Closed, 0, &Timing::default());
        assert_eq!(t, Tick { load_next: false, opacity: None, next: None });
    }
}
