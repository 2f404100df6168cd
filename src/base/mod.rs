//! Base types and error handling.
//!
//! Provides foundational types:
//! - [`NetError`](neterror::NetError): Network error codes matching Chromium's `net_error_list.h`
//! - [`ReadyState`](readystate::ReadyState): Socket connection states

pub mod neterror;
pub mod readystate;
