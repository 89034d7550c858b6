//! In-game chat overlay controller.
//!
//! This crate is compiled to WebAssembly and runs inside the host game
//! client's embedded web view. It owns the state of a floating chat panel:
//! open/close lifecycle, chat-type selection, message composition, whisper
//! mode, a bounded message log, and drag-to-reposition with a persisted
//! position. The host posts events in and receives fire-and-forget requests
//! out; everything else is local.
//!
//! The controller talks to the page only through injected ports, so the
//! whole state machine runs and is tested natively. The `browser` feature
//! adds the DOM binding in [`web`].
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`controller`] | The state machine, [`controller::ChatController`] |
//! | [`event`] | Inbound host events and the injected event source |
//! | [`request`] | Outbound host requests and the bridge trait |
//! | [`history`] | Bounded message log and eviction |
//! | [`whisper`] | Whisper target state |
//! | [`position`] | Panel geometry, drag sessions, position persistence |
//! | [`counter`] | Character counter levels |
//! | [`chat_type`] | Chat channel enum and labels |
//! | [`view`] | View, clock, and scheduler ports |
//! | [`config`] | Runtime configuration |
//! | [`error`] | Error taxonomy |
//! | [`consts`] | Shared constants (log bound, delays, storage key) |

pub mod chat_type;
pub mod config;
pub mod consts;
pub mod controller;
pub mod counter;
pub mod error;
pub mod event;
pub mod history;
pub mod position;
pub mod request;
pub mod view;
#[cfg(feature = "browser")]
pub mod web;
pub mod whisper;

#[cfg(test)]
mod testing;

pub use config::{ChatConfig, EvictionPolicy};
pub use controller::{ChatController, KeyTarget, Lifecycle, Ports};
pub use error::ChatError;
pub use event::{EventSource, InboundEvent, QueuedEvents};
pub use request::{HostBridge, HostRequest};
