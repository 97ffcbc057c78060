use std::io;
use std::sync::mpsc::Sender;
use std::sync::Arc;

use ratatui::{backend::Backend, Frame, Terminal};
use tracing::debug;

use crate::engine::{spawn_flip, EntropySource, FlipEngine};
use crate::keymap::map_key;
use crate::runtime::{AppEvent, EventSource, Runner, Ticker};
use crate::session::{Effect, SessionEvent, SessionState};
use crate::view::SessionView;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopControl {
    Continue,
    Quit,
}

/// Interactive controller: owns the session and starts flips off-thread.
pub struct App<S: EntropySource> {
    pub session: SessionState,
    engine: Arc<FlipEngine<S>>,
    completions: Sender<AppEvent>,
    spinner_tick: usize,
}

impl<S: EntropySource> App<S> {
    pub fn new(
        session: SessionState,
        engine: Arc<FlipEngine<S>>,
        completions: Sender<AppEvent>,
    ) -> Self {
        Self {
            session,
            engine,
            completions,
            spinner_tick: 0,
        }
    }

    pub fn handle(&mut self, event: AppEvent) -> LoopControl {
        match event {
            AppEvent::Key(key) => match map_key(key, self.session.phase()) {
                Some(session_event) => self.dispatch(session_event),
                None => LoopControl::Continue,
            },
            AppEvent::Resize => LoopControl::Continue,
            AppEvent::Tick => {
                if self.session.is_loading() {
                    self.spinner_tick = self.spinner_tick.wrapping_add(1);
                }
                LoopControl::Continue
            }
            AppEvent::FlipCompleted(outcome) => {
                self.dispatch(SessionEvent::FlipCompleted(outcome))
            }
        }
    }

    pub fn dispatch(&mut self, event: SessionEvent) -> LoopControl {
        match self.session.apply(event) {
            Effect::StartFlip(selector) => {
                debug!(source = selector.tag(), "starting flip");
                let completions = self.completions.clone();
                // never joined: quitting must not wait for the network
                spawn_flip(Arc::clone(&self.engine), selector, move |outcome| {
                    let _ = completions.send(AppEvent::FlipCompleted(outcome));
                });
                LoopControl::Continue
            }
            Effect::Quit => LoopControl::Quit,
            Effect::None | Effect::Ignored => LoopControl::Continue,
        }
    }

    pub fn view(&self, width: u16) -> SessionView {
        SessionView::build(&self.session, width, self.spinner_tick)
    }
}

fn ui<S: EntropySource>(app: &App<S>, f: &mut Frame) {
    let area = f.area();
    let view = app.view(area.width);
    f.render_widget(&view, area);
}

/// Drive the loop until a quit event. Redraws after every event except idle ticks.
pub fn run<B, E, T, S>(
    terminal: &mut Terminal<B>,
    app: &mut App<S>,
    runner: &Runner<E, T>,
) -> io::Result<()>
where
    B: Backend,
    E: EventSource,
    T: Ticker,
    S: EntropySource,
{
    terminal.draw(|f| ui(app, f))?;

    loop {
        let event = runner.step();
        let redraw = !matches!(event, AppEvent::Tick) || app.session.is_loading();

        if app.handle(event) == LoopControl::Quit {
            break;
        }
        if redraw {
            terminal.draw(|f| ui(app, f))?;
        }
    }

    Ok(())
}
