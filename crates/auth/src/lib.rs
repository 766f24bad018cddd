//! `fleetwatch-auth` — cookie-based authentication session lifecycle.
//!
//! This crate is intentionally decoupled from HTTP and storage: it holds the
//! token codec, the session issuer/renewer/terminator and the capability
//! trait they need from user storage. Transport glue lives in
//! `fleetwatch-api`; the in-memory directory lives in `fleetwatch-infra`.

pub mod account;
pub mod config;
pub mod cookies;
pub mod credential;
pub mod directory;
pub mod permissions;
pub mod roles;
pub mod session;
pub mod token;

pub use account::UserAccount;
pub use config::{AuthConfig, ConfigError, CookieConfig, MIN_SECRET_BYTES, SigningSecret};
pub use cookies::SetCookie;
pub use credential::{CredentialError, PasswordHash};
pub use directory::UserDirectory;
pub use permissions::Permission;
pub use roles::Role;
pub use session::{
    ClearedSession, Credentials, IssuedSession, LoginOutcome, PresentedTokens, RefreshOutcome,
    SessionIssuer, SessionRenewer, SessionTerminator,
};
pub use token::{DecodedToken, ROLE_CLAIM, TokenCodec, TokenError};
