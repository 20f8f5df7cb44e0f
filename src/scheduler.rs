//! Frame scheduling
//!
//! While a round is running, every display refresh advances the simulation
//! one tick and renders the result. The host owns the callback mechanism
//! (requestAnimationFrame on the web, a plain loop natively); it only has to
//! hand back the `FrameTicket` it was given. Tickets are invalidated on every
//! phase change and on `stop`, so a callback that fires late does nothing.

use crate::renderer::{Frame, render};
use crate::sim::{GapSource, Phase, SimEvent, SimulationState, TickInput, advance};
use crate::tuning::{Tuning, TuningError};

/// Receives simulation events in emission order
pub trait EventSink {
    fn on_event(&mut self, event: &SimEvent);
}

impl EventSink for Vec<SimEvent> {
    fn on_event(&mut self, event: &SimEvent) {
        self.push(*event);
    }
}

/// Permission to run one scheduled frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameTicket {
    generation: u64,
}

/// What the host should do after a phase change
#[derive(Debug)]
pub enum PhaseStart {
    /// Present this frame once; nothing is scheduled
    Static(Frame),
    /// Schedule a frame callback with this ticket
    Scheduled(FrameTicket),
}

/// Result of one scheduled frame
#[derive(Debug)]
pub struct FrameOutput {
    pub frame: Frame,
    /// Ticket for the next callback, `None` once the round has ended
    pub next: Option<FrameTicket>,
}

pub struct FrameScheduler<G> {
    tuning: Tuning,
    gaps: G,
    state: SimulationState,
    phase: Phase,
    pending_impulse: bool,
    generation: u64,
    armed: bool,
}

impl<G: GapSource> FrameScheduler<G> {
    pub fn new(tuning: Tuning, gaps: G) -> Result<Self, TuningError> {
        tuning.validate()?;
        Ok(Self {
            tuning,
            gaps,
            state: SimulationState::new(tuning),
            phase: Phase::Menu,
            pending_impulse: false,
            generation: 0,
            armed: false,
        })
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Snapshot of the current round
    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    /// Switch phase; entering `Playing` starts a fresh round
    pub fn enter_phase(&mut self, phase: Phase) -> PhaseStart {
        self.generation += 1;
        self.pending_impulse = false;
        self.phase = phase;

        if phase == Phase::Playing {
            self.state = SimulationState::new(self.tuning);
            self.armed = true;
            log::info!("Round started");
            PhaseStart::Scheduled(self.ticket())
        } else {
            self.armed = false;
            PhaseStart::Static(render(&self.state, phase))
        }
    }

    /// Invalidate every outstanding ticket
    pub fn stop(&mut self) {
        self.generation += 1;
        self.armed = false;
        self.pending_impulse = false;
    }

    /// Queue a flap for the next tick; ignored outside a running round
    pub fn request_impulse(&mut self) -> bool {
        if self.phase == Phase::Playing && self.armed {
            self.pending_impulse = true;
            true
        } else {
            false
        }
    }

    /// Run one frame: advance a tick, forward events, render
    ///
    /// Returns `None` for a stale ticket. When the round ends the terminal
    /// state is rendered once and no further ticket is issued.
    pub fn on_frame(
        &mut self,
        ticket: FrameTicket,
        sink: &mut impl EventSink,
    ) -> Option<FrameOutput> {
        if !self.armed || ticket.generation != self.generation {
            log::debug!("Ignoring stale frame callback");
            return None;
        }

        let input = TickInput {
            impulse: std::mem::take(&mut self.pending_impulse),
        };
        let events = advance(&mut self.state, &input, &mut self.gaps);

        let mut ended = false;
        for event in &events {
            ended |= matches!(event, SimEvent::RoundEnded { .. });
            sink.on_event(event);
        }

        if ended {
            self.stop();
            self.phase = Phase::GameOver;
            return Some(FrameOutput {
                frame: render(&self.state, Phase::GameOver),
                next: None,
            });
        }

        Some(FrameOutput {
            frame: render(&self.state, Phase::Playing),
            next: Some(ticket),
        })
    }

    fn ticket(&self) -> FrameTicket {
        FrameTicket {
            generation: self.generation,
        }
    }
}
