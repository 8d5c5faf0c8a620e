//! Macro for giving tag enums a stable string form
//!
//! Error kinds, auth schemes and lifecycle states all show up in log fields
//! and diagnostic events. This macro gives each of them an `as_str()` and a
//! matching `Display` so the same spelling is used everywhere.
//!
//! # Example
//!
//! ```rust
//! use clustergate_domain::impl_tag_str;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub enum Phase {
//!     Idle,
//!     Busy,
//! }
//!
//! impl_tag_str!(Phase {
//!     Idle => "idle",
//!     Busy => "busy",
//! });
//!
//! assert_eq!(Phase::Busy.as_str(), "busy");
//! assert_eq!(Phase::Idle.to_string(), "idle");
//! ```

/// Implements `as_str()` and `Display` for a field-less enum
#[macro_export]
macro_rules! impl_tag_str {
    ($enum_name:ident { $($variant:ident => $str:expr),+ $(,)? }) => {
        impl $enum_name {
            /// Stable lowercase tag used in logs and diagnostics.
            pub const fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $str,)+
                }
            }
        }

        impl std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}
