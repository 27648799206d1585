//! Plain application objects that the `*_bean` modules expose for management.
//!
//! Nothing here knows about dispatch; each type only keeps its state safe to
//! share behind an `Arc`.

pub mod counter;
pub mod monitor;
pub mod processing;
pub mod service;

pub use counter::*;
pub use monitor::*;
pub use processing::*;
pub use service::*;
