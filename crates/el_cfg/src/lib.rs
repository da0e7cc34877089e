//! Compilation aliases for `cfg` predicates.
//!
//! A crate declares its aliases once:
//!
//! ```
//! pub mod cfg {
//!     el_cfg::define_alias! {
//!         #[cfg(debug_assertions)] => debug,
//!         #[cfg(feature = "never_enabled")] => never,
//!     }
//! }
//!
//! cfg::debug! {
//!     fn only_in_debug() {}
//! }
//!
//! let msg = cfg::never! {
//!     if { "enabled" } else { "disabled" }
//! };
//! assert_eq!(msg, "disabled");
//!
//! assert_eq!(cfg::never!(), false);
//! ```
//!
//! Every alias is either [`enabled!`] or [`disabled!`] under a new name,
//! so the predicate is evaluated in the crate that declares the alias.
#![no_std]

/// Declares `cfg` aliases as macros.
///
/// See the [crate-level documentation](crate) for the accepted syntax.
#[macro_export]
macro_rules! define_alias {
    (@one #[cfg($meta:meta)] => $alias:ident) => {
        #[cfg($meta)]
        #[doc(inline)]
        pub use $crate::enabled as $alias;

        #[cfg(not($meta))]
        #[doc(inline)]
        pub use $crate::disabled as $alias;
    };
    () => {};
    (
        #[cfg($meta:meta)] => $alias:ident
        $(, $($rest:tt)*)?
    ) => {
        $crate::define_alias! { @one #[cfg($meta)] => $alias }
        $( $crate::define_alias! { $($rest)* } )?
    };
}

/// The expansion of an alias whose predicate holds.
///
/// - `alias!()` is `true`.
/// - `alias! { if { a } else { b } }` is `a`.
/// - `alias! { tokens }` is `tokens`.
#[macro_export]
macro_rules! enabled {
    () => { true };
    (if { $($p:tt)* } else { $($n:tt)* }) => { $($p)* };
    ($($p:tt)*) => { $($p)* };
}

/// The expansion of an alias whose predicate does not hold.
///
/// - `alias!()` is `false`.
/// - `alias! { if { a } else { b } }` is `b`.
/// - `alias! { tokens }` expands to nothing.
#[macro_export]
macro_rules! disabled {
    () => { false };
    (if { $($p:tt)* } else { $($n:tt)* }) => { $($n)* };
    ($($p:tt)*) => {};
}
