use std::{
    io,
    time::{Duration, Instant},
};

use crossterm::event;

use crate::tui::event::TuiEvent;

/// Rendering trigger mode.
#[derive(Debug, Clone, Copy, Default)]
pub enum RenderMode {
    /// Render at fixed intervals.
    Interval(Duration),
    /// Render after state changes (tick or crossterm event).
    #[default]
    OnDirty,
}

impl RenderMode {
    /// Creates `Interval` mode from frame rate (FPS).
    #[must_use]
    pub fn interval_from_rate(rate: f64) -> Self {
        Self::Interval(Duration::from_secs_f64(1.0 / rate))
    }
}

/// Event loop state management.
///
/// Manages tick/render intervals and returns the next event via `next()`.
/// If an interval is not set, that event type will not be generated.
///
/// Setting a tick interval (re)arms the tick clock: the first tick fires one
/// full interval later, and later ticks follow the previous one regardless of
/// how often the screen is rendered.
#[derive(Debug)]
pub(super) struct EventLoop {
    tick_interval: Option<Duration>,
    render_mode: RenderMode,
    last_tick: Instant,
    last_render: Instant,
    dirty: bool,
}

impl Default for EventLoop {
    fn default() -> Self {
        Self::new(Instant::now())
    }
}

impl EventLoop {
    /// Creates a new `EventLoop`.
    ///
    /// Tick interval is unset, and render mode defaults to `OnDirty`.
    pub(super) fn new(now: Instant) -> Self {
        let past_time = now.checked_sub(Duration::from_secs(86400)).unwrap_or(now);
        Self {
            tick_interval: None,
            render_mode: RenderMode::default(),
            last_tick: now,
            last_render: past_time,
            dirty: true, // Initial render is required on startup
        }
    }

    /// Sets the tick interval and restarts the tick clock at `now`.
    ///
    /// Pass `None` to stop tick events.
    pub(super) fn set_tick_interval(&mut self, interval: Option<Duration>, now: Instant) {
        self.tick_interval = interval;
        self.last_tick = now;
    }

    pub(super) fn tick_interval(&self) -> Option<Duration> {
        self.tick_interval
    }

    pub(super) fn set_render_mode(&mut self, render_mode: RenderMode) {
        self.render_mode = render_mode;
    }

    /// Returns the next event.
    ///
    /// Blocks until a tick/render time is reached or a crossterm event occurs.
    /// If both tick and render are unset, only waits for crossterm events.
    pub(super) fn next(&mut self) -> io::Result<TuiEvent> {
        loop {
            let now = Instant::now();
            if let Some(event) = self.scheduled_event(now) {
                return Ok(event);
            }

            if let Some(timeout) = self.compute_timeout(now)
                && !event::poll(timeout)?
            {
                continue;
            }

            self.dirty = true;
            return Ok(event::read()?.into());
        }
    }

    /// Returns the tick or render event due at `now`, if any.
    ///
    /// Ticks take priority so a frame rendered at the same instant shows the
    /// state after the tick.
    fn scheduled_event(&mut self, now: Instant) -> Option<TuiEvent> {
        if let Some(tick_interval) = self.tick_interval
            && now.duration_since(self.last_tick) >= tick_interval
        {
            self.last_tick = now;
            self.dirty = true;
            return Some(TuiEvent::Tick);
        }

        let do_render = match self.render_mode {
            RenderMode::Interval(interval) => now.duration_since(self.last_render) >= interval,
            RenderMode::OnDirty => self.dirty,
        };
        if do_render {
            self.last_render = now;
            self.dirty = false;
            return Some(TuiEvent::Render);
        }
        None
    }

    fn compute_timeout(&self, now: Instant) -> Option<Duration> {
        let next_tick_at = self.tick_interval.map(|interval| self.last_tick + interval);
        let next_render_at = match self.render_mode {
            RenderMode::Interval(interval) => Some(self.last_render + interval),
            RenderMode::OnDirty => self.dirty.then_some(now),
        };
        let next_timeout_at = [next_tick_at, next_render_at].into_iter().flatten().min()?;
        Some(next_timeout_at.saturating_duration_since(now))
    }
}
