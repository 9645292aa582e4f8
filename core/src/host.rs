//! Host integration: the self-rescheduling display loop.
//!
//! The harness never blocks in a loop of its own. Each tick ends by asking
//! the host for the next display frame, and the host calls back when it is
//! ready (`requestAnimationFrame` in a browser, a vsync-paced queue on the
//! desktop). Key events are delivered by the host between those callbacks on
//! the same thread, which is why shared state here is `Rc<RefCell<_>>`.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use tracing::{error, info};

use crate::core::machine::EmulationCore;
use crate::driver::{DriverState, FrameDriver};
use crate::error::{HarnessError, HostError};
use crate::input::{InputAggregator, InputId, KeyDisposition};
use crate::video::DisplaySurface;
use crate::video::present::Presenter;

/// Callback run once for a display frame; the argument is the host's
/// timestamp in milliseconds.
pub type TickCallback = Box<dyn FnOnce(f64)>;

/// Per-display-frame scheduling primitive provided by the host.
pub trait FrameScheduler {
    /// Run `callback` once, before the next repaint.
    fn request_frame(&self, callback: TickCallback) -> Result<(), HostError>;
}

/// Scheduler whose frames are pumped explicitly by the owner.
///
/// Headless runs and tests call [`run_next`](Self::run_next) to deliver one
/// display frame; the desktop host calls it once per vsync'd present.
#[derive(Default)]
pub struct ManualScheduler {
    queue: RefCell<VecDeque<TickCallback>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending(&self) -> usize {
        self.queue.borrow().len()
    }

    /// Deliver one display frame. Returns `false` if nothing was waiting.
    pub fn run_next(&self, timestamp_ms: f64) -> bool {
        // Pop before running: the callback re-registers itself.
        let next = self.queue.borrow_mut().pop_front();
        match next {
            Some(callback) => {
                callback(timestamp_ms);
                true
            }
            None => false,
        }
    }
}

impl FrameScheduler for ManualScheduler {
    fn request_frame(&self, callback: TickCallback) -> Result<(), HostError> {
        self.queue.borrow_mut().push_back(callback);
        Ok(())
    }
}

/// Shared handle the host's keyboard listeners write through.
#[derive(Clone, Default)]
pub struct InputHandle {
    inner: Rc<RefCell<InputAggregator>>,
}

impl InputHandle {
    pub fn on_key_down(&self, code: &str) -> KeyDisposition {
        self.inner.borrow_mut().on_key_down(code)
    }

    pub fn on_key_up(&self, code: &str) -> KeyDisposition {
        self.inner.borrow_mut().on_key_up(code)
    }

    pub fn press(&self, id: InputId) -> bool {
        self.inner.borrow_mut().press(id)
    }

    pub fn release(&self, id: InputId) -> bool {
        self.inner.borrow_mut().release(id)
    }

    pub fn release_all(&self) {
        self.inner.borrow_mut().release_all();
    }

    pub fn with<R>(&self, f: impl FnOnce(&InputAggregator) -> R) -> R {
        f(&self.inner.borrow())
    }
}

struct SessionState<C: EmulationCore + ?Sized, P> {
    driver: FrameDriver<C>,
    presenter: P,
    started: bool,
    stopped: bool,
    last_error: Option<HarnessError>,
}

/// A running harness: driver, presenter and input, bound to a host scheduler.
pub struct Session<C: EmulationCore + ?Sized, P> {
    state: Rc<RefCell<SessionState<C, P>>>,
    input: InputHandle,
}

impl<C: EmulationCore + ?Sized + 'static, P: Presenter + 'static> Session<C, P> {
    pub fn new(core: Box<C>, presenter: P) -> Self {
        Self {
            state: Rc::new(RefCell::new(SessionState {
                driver: FrameDriver::new(core),
                presenter,
                started: false,
                stopped: false,
                last_error: None,
            })),
            input: InputHandle::default(),
        }
    }

    pub fn input(&self) -> InputHandle {
        self.input.clone()
    }

    /// Register the first tick with `scheduler`. Every tick registers the
    /// next one until the driver halts.
    pub fn start<S: FrameScheduler + 'static>(&self, scheduler: Rc<S>) -> Result<(), HarnessError> {
        if self.state.borrow().started {
            return Err(HarnessError::AlreadyStarted);
        }
        info!("session starting");
        schedule_tick(Rc::clone(&self.state), self.input.clone(), scheduler)?;
        self.state.borrow_mut().started = true;
        Ok(())
    }

    /// Stop the loop from the host side. The tick already registered with
    /// the scheduler still fires, but it neither advances the core nor
    /// registers another one.
    pub fn stop(&self) {
        let mut session = self.state.borrow_mut();
        if !session.stopped {
            info!(frames = session.driver.frame_count(), "session stopping");
            session.stopped = true;
        }
    }

    pub fn is_stopped(&self) -> bool {
        self.state.borrow().stopped
    }

    pub fn state(&self) -> DriverState {
        self.state.borrow().driver.state()
    }

    pub fn is_halted(&self) -> bool {
        self.state() == DriverState::Halted
    }

    pub fn frame_count(&self) -> u64 {
        self.state.borrow().driver.frame_count()
    }

    /// The failure that halted the session, if any. Taking it leaves the
    /// session halted.
    pub fn take_error(&self) -> Option<HarnessError> {
        self.state.borrow_mut().last_error.take()
    }

    pub fn with_surface<R>(&self, f: impl FnOnce(&DisplaySurface) -> R) -> R {
        f(self.state.borrow().driver.surface())
    }

    pub fn with_presenter<R>(&self, f: impl FnOnce(&P) -> R) -> R {
        f(&self.state.borrow().presenter)
    }

    pub fn with_core<R>(&self, f: impl FnOnce(&C) -> R) -> R {
        f(self.state.borrow().driver.core())
    }
}

fn schedule_tick<C, P, S>(
    state: Rc<RefCell<SessionState<C, P>>>,
    input: InputHandle,
    scheduler: Rc<S>,
) -> Result<(), HostError>
where
    C: EmulationCore + ?Sized + 'static,
    P: Presenter + 'static,
    S: FrameScheduler + 'static,
{
    let next = Rc::clone(&scheduler);
    scheduler.request_frame(Box::new(move |_timestamp: f64| {
        let outcome = {
            let mut session = state.borrow_mut();
            if session.stopped {
                return;
            }
            let SessionState {
                driver, presenter, ..
            } = &mut *session;
            input.with(|aggregator| driver.tick(aggregator, presenter))
        };

        match outcome {
            Ok(_) => {
                if let Err(err) = schedule_tick(Rc::clone(&state), input, next) {
                    error!(%err, "could not schedule next frame");
                    let mut session = state.borrow_mut();
                    session.driver.halt();
                    session.last_error = Some(err.into());
                }
            }
            Err(err) => state.borrow_mut().last_error = Some(err),
        }
    }))
}
