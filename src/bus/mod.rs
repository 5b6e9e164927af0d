//! The shared mixing point every synthesized sound passes through.
//!
//! [`context::AudioContext`] is the control-side handle: it opens the bus,
//! connects and disconnects sources and writes the master gain.
//! [`master::MasterBus`] is the render side, owned by whatever
//! [`backend::AudioBackend`] pulls audio out of it.

pub mod backend;
pub mod command;
pub mod context;
pub mod master;

pub use backend::{AudioBackend, OfflineBackend, OfflineOutput};
pub use command::NodeId;
pub use context::{AudioContext, ContextState, Unlock};
pub use master::MasterBus;
