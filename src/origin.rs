//! Ambient origin detection.
//!
//! A client hosted inside a page inherits the page's transport security:
//! when the page was served over `https:`, sockets default to `wss`.
//! The host environment is reached through [`AmbientOriginProvider`] so that
//! nothing here depends on process-wide globals.

use url::Url;

/// Answers whether the current execution context sits on an encrypted origin.
pub trait AmbientOriginProvider: Send + Sync {
    fn is_encrypted(&self) -> bool;
}

/// Provider for hosts without any page context. Always reports `false`.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoAmbientOrigin;

impl AmbientOriginProvider for NoAmbientOrigin {
    fn is_encrypted(&self) -> bool {
        false
    }
}

/// Provider backed by a page location.
///
/// Only the protocol matters; it is stored normalized with a trailing
/// colon, the way `location.protocol` reports it (`"https:"`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageOrigin {
    protocol: String,
}

impl PageOrigin {
    /// Build from a `location.protocol` style string (`"https:"` or `"https"`).
    pub fn from_protocol(protocol: &str) -> Self {
        let mut protocol = protocol.trim().to_ascii_lowercase();
        if !protocol.ends_with(':') {
            protocol.push(':');
        }
        Self { protocol }
    }

    /// Build from the full page URL.
    pub fn from_url(url: &Url) -> Self {
        Self::from_protocol(url.scheme())
    }

    pub fn protocol(&self) -> &str {
        &self.protocol
    }
}

impl AmbientOriginProvider for PageOrigin {
    fn is_encrypted(&self) -> bool {
        self.protocol == "https:"
    }
}
