pub mod controller;
pub mod core;
pub mod driver;
pub mod error;
pub mod host;
pub mod input;
pub mod video;

pub mod prelude {
    pub use crate::controller::{Button, ControllerSnapshot};
    pub use crate::core::machine::EmulationCore;
    pub use crate::driver::{DriverState, FrameDriver, TickReport};
    pub use crate::error::{CoreError, HarnessError, HostError};
    pub use crate::host::{FrameScheduler, InputHandle, ManualScheduler, Session};
    pub use crate::input::{InputAggregator, InputId, KeyDisposition};
    pub use crate::video::present::{MemoryPresenter, Presenter};
    pub use crate::video::{DisplaySurface, HEIGHT, WIDTH};
}
