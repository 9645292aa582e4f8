//! Frame driver: advances the core one frame per display tick.
//!
//! Each tick runs to completion before the host delivers anything else, so
//! the input read in step 3 reflects exactly the key events delivered before
//! the tick began. The snapshot pushed in tick N is first seen by the core
//! when it renders tick N+1.

use tracing::{error, info, trace};

use crate::controller::ControllerSnapshot;
use crate::core::machine::EmulationCore;
use crate::error::HarnessError;
use crate::input::InputAggregator;
use crate::video::present::Presenter;
use crate::video::{DisplaySurface, decode_frame};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DriverState {
    /// Built, no tick run yet.
    Idle,
    /// Ticking once per display frame.
    Running,
    /// A fatal failure stopped the loop; no further ticks run.
    Halted,
}

/// What a completed tick did.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TickReport {
    /// 1-based number of the frame just presented.
    pub frame: u64,
    /// Snapshot handed to the core for its next frame.
    pub snapshot: ControllerSnapshot,
}

pub struct FrameDriver<C: EmulationCore + ?Sized> {
    core: Box<C>,
    surface: DisplaySurface,
    state: DriverState,
    frames: u64,
}

impl<C: EmulationCore + ?Sized> FrameDriver<C> {
    pub fn new(core: Box<C>) -> Self {
        Self {
            core,
            surface: DisplaySurface::new(),
            state: DriverState::Idle,
            frames: 0,
        }
    }

    pub fn state(&self) -> DriverState {
        self.state
    }

    /// Frames presented so far.
    pub fn frame_count(&self) -> u64 {
        self.frames
    }

    /// The most recently presented frame.
    pub fn surface(&self) -> &DisplaySurface {
        &self.surface
    }

    pub fn core(&self) -> &C {
        &self.core
    }

    /// Run one tick: advance, decode, present, then push the controller
    /// snapshot for the next frame.
    ///
    /// Any failure halts the driver for good; a halted driver refuses to
    /// tick again rather than present a stale frame.
    pub fn tick(
        &mut self,
        input: &InputAggregator,
        presenter: &mut dyn Presenter,
    ) -> Result<TickReport, HarnessError> {
        match self.state {
            DriverState::Halted => return Err(HarnessError::Halted),
            DriverState::Idle => {
                info!("frame driver running");
                self.state = DriverState::Running;
            }
            DriverState::Running => {}
        }

        match self.step(input, presenter) {
            Ok(report) => {
                trace!(frame = report.frame, buttons = report.snapshot.bits(), "tick");
                Ok(report)
            }
            Err(err) => {
                error!(frame = self.frames + 1, %err, "frame driver halted");
                self.state = DriverState::Halted;
                Err(err)
            }
        }
    }

    /// Mark the driver halted because something outside the tick failed
    /// (e.g. the next tick could not be scheduled).
    pub fn halt(&mut self) {
        self.state = DriverState::Halted;
    }

    fn step(
        &mut self,
        input: &InputAggregator,
        presenter: &mut dyn Presenter,
    ) -> Result<TickReport, HarnessError> {
        self.core.advance_one_frame()?;

        decode_frame(self.core.current_frame_buffer(), &mut self.surface)?;
        presenter.present(&self.surface)?;
        self.frames += 1;

        let snapshot = input.snapshot();
        self.core.submit_controller_snapshot(snapshot);

        Ok(TickReport {
            frame: self.frames,
            snapshot,
        })
    }
}
