#![forbid(unsafe_code)]
//! Physical quantities and units.
//!
//! Values carry a [`Reference`] (quantity spec + unit). Mixing unrelated
//! quantities, or converting in a way that can silently lose precision or
//! overflow, is reported as an [`Error`]. The numeric representation stays a
//! type parameter, so lossy implicit representation changes do not compile.
//!
//! Systems of units are declared by the caller with the macros in
//! [`macros`]; the crate ships no predefined system.

mod cast;
mod dimension;
mod error;
mod expr;
mod magnitude;
mod point;
mod quantity;
mod quantity_spec;
mod reference;
mod repr;
mod symbol;
mod unit;

pub mod macros;
pub mod math;

pub use cast::{conversion_kind, sane_scaling, scaling_overflows_non_zero_values, Conversion};
pub use dimension::{BaseDimension, Dimension, NamedDimension};
pub use error::{Error, Result};
pub use expr::{Atom, Exponent, Expr};
pub use magnitude::{mag, mag_power, mag_ratio, MagBase, MagConstant, Magnitude};
pub use point::{PointOrigin, QuantityPoint};
pub use quantity::Quantity;
pub use quantity_spec::{
    NamedQuantitySpec, QuantityCharacter, QuantitySpec, QuantitySpecBuilder, SpecConvertibility,
};
pub use reference::Reference;
pub use repr::{CastFrom, ImplicitFrom, Limit, Representation, Scalar, Vector};
pub use symbol::{SymbolText, TextEncoding};
pub use unit::{BaseUnit, CanonicalUnit, NamedUnit, Prefix, Unit, UnitBuilder};
