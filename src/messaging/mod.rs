//! Messaging subsystem: the framework's event bus.
//!
//! # Data Flow
//! ```text
//! Boot:
//!     aggregates.attach_listeners(dispatcher)
//!     → dispatcher emits routes.collect
//!     → responses merged into the route collection
//!
//! Per request:
//!     match failure → Message (routes.not_found / routes.method_not_allowed)
//!     → dispatcher.notify
//!     → application listeners react generically
//! ```
//!
//! # Design Decisions
//! - Listeners run in (priority desc, attach order asc); stop() halts
//!   the remainder of the traversal
//! - Dispatch iterates a snapshot, so actions may re-enter the dispatcher
//! - Message names and parameter values are closed, validated types

pub mod dispatcher;
pub mod listener;
pub mod message;
mod queue;

pub use dispatcher::{DispatchError, MessageDispatcher};
pub use listener::{
    Listener, ListenerAggregate, ListenerId, ListenerPattern, Priority,
};
pub use message::{keys, names, Message, MessageError, MessageName, ParamValue, Params, Response, SenderId};
