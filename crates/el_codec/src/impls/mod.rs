//! Built-in registrations.
//!
//! ## Implemented Menu
//!
//! - providers (`Value` attribute, see [`PrimitiveProvider`]):
//!     - `bool`, `char`
//!     - `i8`-`i128`, `u8`-`u128`, `isize`, `usize`, `f32`, `f64`
//!     - `String`
//! - nullable: `Option<T>`
//! - polymorphic slots: `Box<dyn I>` for every [`Interface`] `I`
//! - lists: `Vec<T>`, see [`collection`](crate::collection)
//! - dictionaries: `HashMap<K, V>`, `BTreeMap<K, V>`,
//!   `el_utils::hash::HashMap<K, V>`
//! - arrays: [`NdArray<T>`](crate::array::NdArray)
//!
//! [`Interface`]: crate::interface::Interface

// -----------------------------------------------------------------------------
// Modules

mod boxed;
mod option;
mod primitives;

// -----------------------------------------------------------------------------
// Exports

pub use primitives::PrimitiveProvider;
