//! Per-channel deploy strategies.
//!
//! Each strategy implements the four command slots for one channel. Slots
//! a channel does not rebind delegate to [`browser::BrowserStrategy`], the
//! universal default.

pub(crate) mod browser;
pub(crate) mod electron;
pub(crate) mod local_server;
pub(crate) mod native_host;
pub(crate) mod packet;
pub(crate) mod winrt;
