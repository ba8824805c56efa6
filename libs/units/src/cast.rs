//! The conversion and cast engine.
//!
//! Decides whether a change of unit and representation is value-preserving
//! (implicit), needs to be requested explicitly, or is rejected outright, and
//! performs the rescaling of the stored number.

use crate::error::{Error, Result};
use crate::reference::Reference;
use crate::repr::{Limit, Representation};
use crate::quantity_spec::SpecConvertibility;
use crate::unit::Unit;
use num_bigint::BigUint;
use num_traits::ToPrimitive;

/// Whether a conversion may happen implicitly or has to be spelled out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Conversion {
    Implicit,
    Explicit,
}

/// True when scaling a value from `from` to `to` can overflow `R` for some
/// non-zero value, i.e. the numerator of the conversion factor exceeds the
/// largest value of `R`.
pub fn scaling_overflows_non_zero_values<R: Representation>(from: &Unit, to: &Unit) -> bool {
    let (from, to) = (from.canonical(), to.canonical());
    if from.magnitude == to.magnitude {
        return false;
    }
    let factor = from.magnitude.divide(&to.magnitude).numerator();
    exceeds::<R>(&factor)
}

fn exceeds<R: Representation>(factor: &BigUint) -> bool {
    match R::max_value() {
        None => false,
        Some(Limit::Integer(max)) => *factor > BigUint::from(max),
        Some(Limit::Float(max)) => factor.to_f64().map_or(true, |factor| factor > max),
    }
}

/// The check every explicit cast performs: the units must be convertible and
/// the scaling must not overflow `R`.
pub fn sane_scaling<R: Representation>(from: &Unit, to: &Unit) -> Result<()> {
    if !from.convertible(to) {
        tracing::debug!(from = %from, to = %to, "units are not convertible");
        return Err(Error::UnitNotConvertible {
            from: from.to_string(),
            to: to.to_string(),
        });
    }
    if scaling_overflows_non_zero_values::<R>(from, to) {
        tracing::debug!(from = %from, to = %to, rep = R::type_name(), "scaling overflows representation");
        return Err(Error::ScalingOverflow {
            from: from.to_string(),
            to: to.to_string(),
            rep: R::type_name(),
        });
    }
    Ok(())
}

/// Rules for an implicit change of unit from an `F` value into a `T` value.
///
/// Floating targets accept any non-overflowing factor. Integral targets need
/// an integral source and an integral factor no larger than their maximum.
pub fn implicit_scaling<F: Representation, T: Representation>(
    from: &Unit,
    to: &Unit,
) -> Result<()> {
    sane_scaling::<T>(from, to)?;
    if T::FLOATING_POINT {
        return Ok(());
    }
    let factor = from.conversion_factor(to)?;
    if F::FLOATING_POINT || !factor.is_integral() {
        tracing::debug!(from = %from, to = %to, rep = T::type_name(), "implicit conversion would truncate");
        return Err(Error::TruncatingConversion {
            from: from.to_string(),
            to: to.to_string(),
            rep: T::type_name(),
        });
    }
    Ok(())
}

/// Classifies a conversion between two references and representations.
///
/// Errors when no conversion exists at all: unrelated quantities,
/// non-convertible units or an overflowing scale factor.
pub fn conversion_kind<F: Representation, T: Representation>(
    from: &Reference,
    to: &Reference,
) -> Result<Conversion> {
    let spec = from.quantity_spec().convertible(to.quantity_spec());
    if spec == SpecConvertibility::No {
        return Err(Error::IncompatibleQuantities {
            lhs: from.quantity_spec().to_string(),
            rhs: to.quantity_spec().to_string(),
        });
    }
    sane_scaling::<T>(from.unit(), to.unit())?;
    let implicit = spec == SpecConvertibility::Implicit
        && implicit_scaling::<F, T>(from.unit(), to.unit()).is_ok();
    Ok(if implicit {
        Conversion::Implicit
    } else {
        Conversion::Explicit
    })
}

/// Rescales `value` from `from` to `to` without any check beyond convertibility.
pub(crate) fn rescale<R: Representation>(value: &R, from: &Unit, to: &Unit) -> Result<R> {
    let factor = from.conversion_factor(to)?;
    Ok(if factor.is_one() {
        value.clone()
    } else {
        value.scale(&factor)
    })
}
