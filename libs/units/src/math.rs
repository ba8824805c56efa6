//! Mathematical functions on quantities.
//!
//! Powers and roots transform the reference along with the value. Rounding
//! functions take the unit to round in and compute in exact rationals where
//! the representation allows it.

use crate::cast::{rescale, sane_scaling};
use crate::error::Result;
use crate::expr::Exponent;
use crate::quantity::Quantity;
use crate::reference::Reference;
use crate::repr::Scalar;
use crate::unit::Unit;
use num_rational::BigRational;
use num_traits::{Float, Signed};

/// `q^(num/den)`. Integral non-negative exponents multiply exactly; other
/// exponents go through `f64`.
///
/// # Panics
/// When `den` is zero.
pub fn pow<R: Scalar>(q: &Quantity<R>, num: i64, den: i64) -> Quantity<R> {
    let exp = Exponent::new(num, den);
    let reference = q.reference().pow_exponent(exp);
    let value = *q.numerical_value_ref();
    let result = match exp.to_integer() {
        n if exp.is_integer() && n >= 0 => (0..n).fold(R::one(), |acc, _| acc * value),
        _ => R::from_f64(value.to_f64().powf(num as f64 / den as f64)),
    };
    Quantity::new_unchecked(result, reference)
}

pub fn sqrt<R: Scalar>(q: &Quantity<R>) -> Quantity<R> {
    let reference = q.reference().pow_exponent(Exponent::new(1, 2));
    Quantity::new_unchecked(R::from_f64(q.numerical_value_ref().to_f64().sqrt()), reference)
}

pub fn cbrt<R: Scalar>(q: &Quantity<R>) -> Quantity<R> {
    let reference = q.reference().pow_exponent(Exponent::new(1, 3));
    Quantity::new_unchecked(R::from_f64(q.numerical_value_ref().to_f64().cbrt()), reference)
}

pub fn abs<R: Scalar + Signed>(q: &Quantity<R>) -> Quantity<R> {
    Quantity::new_unchecked(Signed::abs(q.numerical_value_ref()), q.reference().clone())
}

/// The representation's epsilon in `reference`.
pub fn epsilon<R: Scalar>(reference: impl Into<Reference>) -> Result<Quantity<R>> {
    Quantity::new(R::epsilon(), reference)
}

/// Largest value not greater than `q` that is integral in `unit`.
pub fn floor<R: Scalar>(q: &Quantity<R>, unit: &Unit) -> Result<Quantity<R>> {
    round_in(q, unit, BigRational::floor, f64::floor)
}

/// Smallest value not less than `q` that is integral in `unit`.
pub fn ceil<R: Scalar>(q: &Quantity<R>, unit: &Unit) -> Result<Quantity<R>> {
    round_in(q, unit, BigRational::ceil, f64::ceil)
}

/// Nearest value integral in `unit`; halves round away from zero.
pub fn round<R: Scalar>(q: &Quantity<R>, unit: &Unit) -> Result<Quantity<R>> {
    round_in(q, unit, BigRational::round, f64::round)
}

fn round_in<R: Scalar>(
    q: &Quantity<R>,
    unit: &Unit,
    exact: fn(&BigRational) -> BigRational,
    approx: fn(f64) -> f64,
) -> Result<Quantity<R>> {
    let target = q.target_reference(unit, true)?;
    sane_scaling::<R>(q.unit(), unit)?;
    let factor = q.unit().conversion_factor(unit)?;
    let value = *q.numerical_value_ref();
    let rounded = match (value.to_rational(), factor.to_ratio()) {
        (Some(value), Some(factor)) => R::from_rational(&exact(&(value * factor))),
        _ => R::from_f64(approx(value.to_f64() * factor.value_f64())),
    };
    Ok(Quantity::new_unchecked(rounded, target))
}

/// `sqrt(x² + y²)` in the common unit of both arguments.
pub fn hypot<R: Scalar + Float>(x: &Quantity<R>, y: &Quantity<R>) -> Result<Quantity<R>> {
    let (x, y, reference) = x.common_operands(y)?;
    Ok(Quantity::new_unchecked(x.hypot(y), reference))
}

/// `sqrt(x² + y² + z²)` in the common unit of all three arguments.
pub fn hypot3<R: Scalar + Float>(
    x: &Quantity<R>,
    y: &Quantity<R>,
    z: &Quantity<R>,
) -> Result<Quantity<R>> {
    let spec = x
        .quantity_spec()
        .common_quantity_spec(y.quantity_spec())?
        .common_quantity_spec(z.quantity_spec())?;
    let unit = x.unit().common_unit(y.unit())?.common_unit(z.unit())?;
    let [x, y, z] = [x, y, z].map(|q| rescale(q.numerical_value_ref(), q.unit(), &unit));
    let (x, y, z) = (x?, y?, z?);
    Ok(Quantity::new_unchecked(
        (x * x + y * y + z * z).sqrt(),
        Reference::new_unchecked(spec, unit),
    ))
}
