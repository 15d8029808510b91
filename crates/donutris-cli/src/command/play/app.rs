use crossterm::event::Event;
use donutris_engine::{Command, GameSession, SessionState};
use ratatui::{
    Frame,
    layout::{Constraint, Flex, Layout},
    widgets::Block as BlockWidget,
};

use crate::{
    input::{self, Input},
    tui::{App, RenderMode, Runtime},
    view::widgets::{DonutDisplay, GameOverDisplay, KeyBindingDisplay, StatsDisplay, style},
};

const FPS: f64 = 30.0;

/// Interactive play screen.
///
/// Owns the session and keeps the runtime's tick clock in step with it: the
/// clock stops when a game ends and restarts from zero on a new game.
#[derive(Debug)]
pub struct PlayApp {
    session: GameSession,
    is_exiting: bool,
}

impl PlayApp {
    pub fn new(session: GameSession) -> Self {
        Self {
            session,
            is_exiting: false,
        }
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    fn apply(&mut self, runtime: &mut Runtime, command: Command) {
        let before = self.session.session_state();
        self.session.apply(command);
        self.sync_tick_clock(runtime, before);
    }

    fn sync_tick_clock(&self, runtime: &mut Runtime, before: SessionState) {
        match (before, self.session.session_state()) {
            (SessionState::Active, SessionState::GameOver) => runtime.stop_ticks(),
            (SessionState::GameOver, SessionState::Active) if !runtime.is_ticking() => {
                runtime.start_ticks(self.session.config().move_interval());
            }
            _ => {}
        }
    }
}

impl App for PlayApp {
    fn init(&mut self, runtime: &mut Runtime) {
        runtime.set_render_mode(RenderMode::interval_from_rate(FPS));
        if self.session.session_state().is_active() {
            runtime.start_ticks(self.session.config().move_interval());
        }
    }

    fn should_exit(&self) -> bool {
        self.is_exiting
    }

    fn handle_event(&mut self, runtime: &mut Runtime, event: Event) {
        let Some(key) = event.as_key_press_event() else {
            return;
        };
        match input::map_key(key) {
            Some(Input::Quit) => self.is_exiting = true,
            Some(Input::Command(command)) => self.apply(runtime, command),
            None => {}
        }
    }

    fn draw(&self, frame: &mut Frame) {
        let donut = DonutDisplay::new(self.session.board())
            .falling_piece(self.session.falling_piece())
            .block(BlockWidget::bordered().title(" DONUTRIS ").style(style::DEFAULT));
        let stats = StatsDisplay::new(&self.session)
            .block(BlockWidget::bordered().title(" STATS ").style(style::DEFAULT));
        let bindings = match self.session.session_state() {
            SessionState::Active => input::PLAYING_BINDINGS,
            SessionState::GameOver => input::GAME_OVER_BINDINGS,
        };

        let [main_area, help_area] =
            Layout::vertical([Constraint::Fill(1), Constraint::Length(1)]).areas(frame.area());
        let donut_height = main_area.height.max(donut.min_height());
        let [donut_area, stats_area] = Layout::horizontal([
            Constraint::Length(donut.width_for(donut_height)),
            Constraint::Length(stats.width()),
        ])
        .flex(Flex::Center)
        .areas(main_area);
        let [stats_area] = Layout::vertical([Constraint::Length(stats.height())]).areas(stats_area);

        frame.render_widget(donut, donut_area);
        frame.render_widget(stats, stats_area);
        if self.session.session_state().is_game_over() {
            frame.render_widget(GameOverDisplay::new(self.session.stats().score()), donut_area);
        }
        frame.render_widget(KeyBindingDisplay::new(bindings), help_area);
    }

    fn update(&mut self, runtime: &mut Runtime) {
        let before = self.session.session_state();
        self.session.tick();
        self.sync_tick_clock(runtime, before);
    }
}
