//! Session core: the stopwatch primitive and the work/rest state machine.
//!
//! - `clock`: injectable time source
//! - `timer`: pausable stopwatch with partial and lifetime accumulators
//! - `controller`: work/rest cycle, iteration counting and alert decisions

pub mod clock;
pub mod controller;
pub mod timer;

pub use clock::{Clock, ManualClock, SystemClock};
pub use controller::{Action, AlertSignal, SessionController, SessionEffect};
pub use timer::Timer;
