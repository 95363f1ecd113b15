//! Sampling core: click pacing and the collection loop.
//!
//! This crate owns the only nontrivial logic in the workspace, kept free of
//! any browser dependency so it can be driven by a fake surface in tests.
//!
//! - [`Cadence`]: lazy plan of wait durations with clustered bursts and
//!   growing backoff pauses between them
//! - [`PickSurface`]: capability seam to whatever produces one pick per tick
//! - [`run_session`]: sleep-then-collect loop consuming a cadence
pub mod cadence;
pub mod session;
pub mod surface;

pub use cadence::{Cadence, CadenceError};
pub use session::run_session;
pub use surface::PickSurface;
