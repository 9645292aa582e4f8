use crate::controller::ControllerSnapshot;
use crate::error::CoreError;

/// Capability interface of an emulation core as seen by the harness.
///
/// The harness never looks inside a core: it builds one from a ROM image,
/// advances it one frame at a time, reads back the finished frame and hands
/// it the controller state to use for the following frame. Anything a core
/// does beyond that (CPU, PPU, mappers) is its own business.
pub trait EmulationCore {
    /// Construct a core from a raw ROM image.
    ///
    /// A malformed image is a startup failure; the harness never retries.
    fn from_rom(rom: &[u8]) -> Result<Self, CoreError>
    where
        Self: Sized;

    /// Advance emulation by exactly one rendered frame.
    fn advance_one_frame(&mut self) -> Result<(), CoreError>;

    /// The most recently rendered frame as packed `0x00RRGGBB` pixels,
    /// row-major from the top-left corner.
    ///
    /// Valid only until the next [`advance_one_frame`](Self::advance_one_frame);
    /// callers copy out what they need before advancing again.
    fn current_frame_buffer(&self) -> &[u32];

    /// Replace the core's view of the controller. Takes effect on the next
    /// call to [`advance_one_frame`](Self::advance_one_frame), never on the
    /// frame already rendered.
    fn submit_controller_snapshot(&mut self, snapshot: ControllerSnapshot);
}
