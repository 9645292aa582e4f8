use thiserror::Error;

/// Failures reported by (or about) an emulation core.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The ROM image could not be turned into a running core.
    #[error("invalid ROM image: {0}")]
    InvalidRom(String),

    /// The core hit an internal fault while advancing a frame.
    #[error("core fault: {0}")]
    Fault(String),

    /// No core with this name is registered.
    #[error("unknown core `{0}`")]
    UnknownCore(String),
}

/// The host platform cannot provide something the harness needs.
#[derive(Debug, Error)]
pub enum HostError {
    #[error("drawing surface unavailable: {0}")]
    MissingSurface(String),

    #[error("display-frame scheduler unavailable: {0}")]
    MissingScheduler(String),

    #[error("failed to present frame: {0}")]
    Present(String),

    #[error("scale factor must be between 1 and {max}, got {0}", max = crate::video::present::MAX_SCALE)]
    InvalidScale(u32),
}

/// Everything that can stop the frame loop.
#[derive(Debug, Error)]
pub enum HarnessError {
    #[error(transparent)]
    Core(#[from] CoreError),

    /// The core handed back a frame of the wrong size.
    #[error("frame buffer holds {actual} pixels, expected {expected}")]
    FrameBufferLength { expected: usize, actual: usize },

    #[error(transparent)]
    Host(#[from] HostError),

    #[error("session already started")]
    AlreadyStarted,

    #[error("frame driver halted after an earlier failure")]
    Halted,
}
