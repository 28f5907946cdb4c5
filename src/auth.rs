use std::time::Duration;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

use crate::config::ServerConfig;
use crate::model::User;

/// Credential attached to every request made through a [`Specification`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credential {
    /// No Authorization header at all. Used by unauthenticated negative
    /// scenarios.
    None,
    /// Constant elevated token; the superuser credential lives outside
    /// test-data scope.
    Bearer { token: String },
    /// Per-user basic credentials taken from a generated user.
    Basic { username: String, password: String },
}

impl Credential {
    /// Render the Authorization header value, if any.
    pub fn authorization(&self) -> Option<String> {
        match self {
            Self::None => None,
            Self::Bearer { token } => Some(format!("Bearer {token}")),
            Self::Basic { username, password } => {
                let encoded = STANDARD.encode(format!("{username}:{password}"));
                Some(format!("Basic {encoded}"))
            }
        }
    }
}

/// An assembled authenticated request context: base address, transport
/// timeout, credential.
///
/// Specifications are immutable after construction and cheap to clone; every
/// request surface built from one applies the same credential consistently.
/// Construction performs no I/O.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Specification {
    pub base_url: String,
    pub timeout: Duration,
    pub credential: Credential,
}

impl Specification {
    /// Context authenticated with the configured superuser token.
    pub fn superuser(config: &ServerConfig) -> Self {
        Self {
            base_url: config.base_url.clone(),
            timeout: config.timeout(),
            credential: Credential::Bearer {
                token: config.superuser_token.clone(),
            },
        }
    }

    /// Context authenticated as a generated user via basic credentials.
    pub fn for_user(config: &ServerConfig, user: &User) -> Self {
        Self {
            base_url: config.base_url.clone(),
            timeout: config.timeout(),
            credential: Credential::Basic {
                username: user.username.clone(),
                password: user.password.clone(),
            },
        }
    }

    /// Context carrying no credential.
    pub fn anonymous(config: &ServerConfig) -> Self {
        Self {
            base_url: config.base_url.clone(),
            timeout: config.timeout(),
            credential: Credential::None,
        }
    }
}
