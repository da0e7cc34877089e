//! Parsed form of a `#[derive(Element)]` input.

// -----------------------------------------------------------------------------
// Modules

mod attributes;
mod element_input;

// -----------------------------------------------------------------------------
// Internal API

pub(crate) use attributes::{FieldAttributes, TypeAttributes, VariantAttributes};
pub(crate) use element_input::{ElementField, ElementInput, ElementShape, ElementVariant};
