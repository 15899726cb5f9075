//! Marshaling of invocations onto the viewer's event-loop thread.
//!
//! GUI toolkits forbid touching their state from non-owning threads, so the
//! network side never calls a handler directly. It posts a
//! [`bridge::PendingInvocation`] onto the event-loop queue and waits, with a
//! deadline, for the single-use completion slot to be filled. See
//! [`bridge::GuiBridge`].

pub mod bridge;

pub use bridge::GuiBridge;
