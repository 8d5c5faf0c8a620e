//! Wire constants
//!
//! Paths, header names and defaults of the cluster management API.

// Connection defaults
pub const DEFAULT_PORT: u16 = 8006;
pub const DEFAULT_REALM: &str = "pam";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

// Paths, relative to the host root
pub const API_ROOT: &str = "/api2/json";
pub const TICKET_PATH: &str = "/access/ticket";
pub const VERSION_PATH: &str = "/version";

// Session material
pub const TICKET_COOKIE: &str = "PVEAuthCookie";
pub const CSRF_HEADER: &str = "CSRFPreventionToken";
pub const AUTHORIZATION_HEADER: &str = "Authorization";
pub const COOKIE_HEADER: &str = "Cookie";

/// Separates the token identifier from its secret in a static API token.
pub const TOKEN_SECRET_SEPARATOR: char = '=';
