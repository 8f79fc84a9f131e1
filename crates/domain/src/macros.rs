//! Macro for implementing Display and FromStr for wire-level enums
//!
//! Several backend values travel as lowercase strings (plan tiers,
//! subscription states, run modes). This macro gives each of them a single
//! Display/FromStr mapping with case-insensitive parsing.
//!
//! # Example
//!
//! ```rust
//! use xanodash_domain::impl_wire_enum_conversions;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub enum InvoiceState {
//!     Draft,
//!     Open,
//!     Paid,
//! }
//!
//! impl_wire_enum_conversions!(InvoiceState {
//!     Draft => "draft",
//!     Open => "open",
//!     Paid => "paid",
//! });
//!
//! assert_eq!(InvoiceState::Paid.to_string(), "paid");
//! assert_eq!("OPEN".parse::<InvoiceState>().unwrap(), InvoiceState::Open);
//! ```

/// Implements Display and FromStr for enums that travel as strings
///
/// # Arguments
///
/// * `$enum_name` - The name of the enum type
/// * `$variant => $str` - Mapping of enum variants to their wire strings
///
/// Parsing is case-insensitive; the error names the enum and the rejected
/// input.
#[macro_export]
macro_rules! impl_wire_enum_conversions {
    ($enum_name:ident { $($variant:ident => $str:literal),+ $(,)? }) => {
        impl ::std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                match self {
                    $(Self::$variant => f.write_str($str),)+
                }
            }
        }

        impl ::std::str::FromStr for $enum_name {
            type Err = ::std::string::String;

            fn from_str(s: &str) -> ::std::result::Result<Self, Self::Err> {
                match s.to_lowercase().as_str() {
                    $($str => ::std::result::Result::Ok(Self::$variant),)+
                    _ => ::std::result::Result::Err(::std::format!("Invalid {}: {}", stringify!($enum_name), s)),
                }
            }
        }
    };
}
