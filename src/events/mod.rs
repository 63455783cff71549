//! Message types exchanged between systems.
//!
//! Messages decouple the system that detects something (a bullet hit, a
//! death, a sound request) from the systems that react to it later in the tick.
//!
//! Submodules:
//! - [`audio`] – commands and notifications for the audio sink
//! - [`input`] – logical gameplay actions
//! - [`lifecycle`] – hurt and death notifications
pub mod audio;
pub mod input;
pub mod lifecycle;
