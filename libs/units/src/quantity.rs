//! Quantities: a number tagged with a [`Reference`].
//!
//! Construction checks that the representation can hold the quantity's
//! character. Unit changes come in three strengths:
//! - [`Quantity::in_unit`] / [`Quantity::convert`]: implicit, value-preserving only
//! - the `value_cast` family: explicit, may truncate, rejects overflowing scale factors
//! - [`Quantity::force_in`]: explicit, saturates instead of rejecting

use crate::cast::{implicit_scaling, rescale, sane_scaling};
use crate::dimension::Dimension;
use crate::error::{Error, Result};
use crate::magnitude::Magnitude;
use crate::quantity_spec::QuantitySpec;
use crate::reference::Reference;
use crate::repr::{CastFrom, ImplicitFrom, Representation, Scalar, Vector};
use crate::symbol::TextEncoding;
use crate::unit::Unit;
use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};

#[cfg(feature = "decimal")]
use rust_decimal::Decimal;

#[derive(Clone)]
pub struct Quantity<R = f64> {
    value: R,
    reference: Reference,
}

pub(crate) fn check_character<R: Representation>(spec: &QuantitySpec) -> Result<()> {
    let character = spec.character();
    if R::CHARACTER != character {
        return Err(Error::CharacterMismatch {
            rep: R::type_name(),
            character: character.as_str(),
            spec: spec.to_string(),
        });
    }
    Ok(())
}

impl<R: Representation> Quantity<R> {
    pub fn new(value: R, reference: impl Into<Reference>) -> Result<Self> {
        let reference = reference.into();
        check_character::<R>(reference.quantity_spec())?;
        Ok(Self::new_unchecked(value, reference))
    }

    pub(crate) fn new_unchecked(value: R, reference: Reference) -> Self {
        Self { value, reference }
    }

    pub fn zero(reference: impl Into<Reference>) -> Result<Self> {
        Self::new(R::zero(), reference)
    }

    pub fn numerical_value_ref(&self) -> &R {
        &self.value
    }

    pub fn into_numerical_value(self) -> R {
        self.value
    }

    pub fn reference(&self) -> &Reference {
        &self.reference
    }

    pub fn quantity_spec(&self) -> &QuantitySpec {
        self.reference.quantity_spec()
    }

    pub fn unit(&self) -> &Unit {
        self.reference.unit()
    }

    pub fn dimension(&self) -> Dimension {
        self.quantity_spec().dimension()
    }

    /// Reference for the same spec in `unit`; `explicit` selects the weak unit check.
    pub(crate) fn target_reference(&self, unit: &Unit, explicit: bool) -> Result<Reference> {
        let spec = self.quantity_spec();
        let accepted = if explicit {
            spec.accepts_unit_explicitly(unit)
        } else {
            spec.accepts_unit(unit)
        };
        if !accepted {
            tracing::debug!(unit = %unit, spec = %spec, "unit rejected for quantity");
            return Err(Error::UnitNotOf {
                unit: unit.to_string(),
                spec: spec.to_string(),
            });
        }
        Ok(Reference::new_unchecked(spec.clone(), unit.clone()))
    }

    /// The same quantity in `unit`, if the conversion cannot lose information.
    pub fn in_unit(&self, unit: &Unit) -> Result<Self> {
        let target = self.target_reference(unit, false)?;
        implicit_scaling::<R, R>(self.unit(), unit)?;
        Ok(Self::new_unchecked(rescale(&self.value, self.unit(), unit)?, target))
    }

    /// Numerical value in `unit`, under the same rules as [`Quantity::in_unit`].
    pub fn numerical_value_in(&self, unit: &Unit) -> Result<R> {
        Ok(self.in_unit(unit)?.value)
    }

    /// Implicit conversion to another reference and representation. Floating
    /// targets may lose precision but not range.
    pub fn convert<T>(&self, to: &Reference) -> Result<Quantity<T>>
    where
        T: Representation + ImplicitFrom<R>,
    {
        if !self.quantity_spec().implicitly_convertible(to.quantity_spec()) {
            tracing::debug!(from = %self.quantity_spec(), to = %to.quantity_spec(), "not implicitly convertible");
            return Err(Error::NotImplicitlyConvertible {
                from: self.quantity_spec().to_string(),
                to: to.quantity_spec().to_string(),
            });
        }
        check_character::<T>(to.quantity_spec())?;
        implicit_scaling::<R, T>(self.unit(), to.unit())?;
        let widened = T::implicit_from(self.value.clone()).ok_or_else(|| {
            tracing::debug!(value = ?self.value, rep = T::type_name(), "value out of range");
            Error::ValueOutOfRange {
                value: format!("{self:?}"),
                rep: T::type_name(),
            }
        })?;
        Ok(Quantity::new_unchecked(
            rescale(&widened, self.unit(), to.unit())?,
            to.clone(),
        ))
    }

    /// Explicit unit change. Integral values truncate toward zero.
    pub fn value_cast(&self, unit: &Unit) -> Result<Self> {
        let target = self.target_reference(unit, true)?;
        sane_scaling::<R>(self.unit(), unit)?;
        Ok(Self::new_unchecked(rescale(&self.value, self.unit(), unit)?, target))
    }

    /// Like [`Quantity::value_cast`] but without the overflow check; values
    /// that do not fit saturate.
    pub fn force_in(&self, unit: &Unit) -> Result<Self> {
        let target = self.target_reference(unit, true)?;
        Ok(Self::new_unchecked(rescale(&self.value, self.unit(), unit)?, target))
    }

    /// Explicit change of representation, keeping the reference.
    pub fn value_cast_rep<T>(&self) -> Result<Quantity<T>>
    where
        T: Representation + CastFrom<R>,
    {
        check_character::<T>(self.quantity_spec())?;
        Ok(Quantity::new_unchecked(
            T::cast_from(self.value.clone()),
            self.reference.clone(),
        ))
    }

    /// Reinterprets the quantity as another spec of a related kind, keeping the value.
    pub fn quantity_cast(&self, spec: &QuantitySpec) -> Result<Self> {
        if !self.quantity_spec().castable(spec) {
            tracing::debug!(from = %self.quantity_spec(), to = %spec, "quantity cast rejected");
            return Err(Error::IncompatibleQuantities {
                lhs: self.quantity_spec().to_string(),
                rhs: spec.to_string(),
            });
        }
        check_character::<R>(spec)?;
        if !spec.accepts_unit_explicitly(self.unit()) {
            return Err(Error::UnitNotOf {
                unit: self.unit().to_string(),
                spec: spec.to_string(),
            });
        }
        Ok(Self::new_unchecked(
            self.value.clone(),
            Reference::new_unchecked(spec.clone(), self.unit().clone()),
        ))
    }

    /// Spec and unit both quantities can be expressed in without loss.
    pub(crate) fn common_reference(&self, other: &Quantity<R>) -> Result<Reference> {
        let spec = self.quantity_spec().common_quantity_spec(other.quantity_spec())?;
        let unit = self.unit().common_unit(other.unit())?;
        Ok(Reference::new_unchecked(spec, unit))
    }

    /// Both values in the common unit.
    pub(crate) fn common_operands(&self, other: &Quantity<R>) -> Result<(R, R, Reference)> {
        let reference = self.common_reference(other)?;
        let lhs = rescale(&self.value, self.unit(), reference.unit())?;
        let rhs = rescale(&other.value, other.unit(), reference.unit())?;
        Ok((lhs, rhs, reference))
    }

    pub fn try_add(&self, other: &Quantity<R>) -> Result<Self>
    where
        R: Add<Output = R>,
    {
        let (lhs, rhs, reference) = self.common_operands(other)?;
        Ok(Self::new_unchecked(lhs + rhs, reference))
    }

    pub fn try_sub(&self, other: &Quantity<R>) -> Result<Self>
    where
        R: Sub<Output = R>,
    {
        let (lhs, rhs, reference) = self.common_operands(other)?;
        Ok(Self::new_unchecked(lhs - rhs, reference))
    }
}

impl<R: Scalar> Quantity<R> {
    /// Explicit change of unit and representation, rounded once.
    pub fn value_cast_to<T>(&self, unit: &Unit) -> Result<Quantity<T>>
    where
        T: Scalar + CastFrom<R>,
    {
        let target = self.target_reference(unit, true)?;
        self.value_cast_into(&target)
    }

    /// Explicit conversion to another reference and representation.
    pub fn value_cast_into<T>(&self, to: &Reference) -> Result<Quantity<T>>
    where
        T: Scalar + CastFrom<R>,
    {
        if !self.quantity_spec().explicitly_convertible(to.quantity_spec()) {
            tracing::debug!(from = %self.quantity_spec(), to = %to.quantity_spec(), "explicit conversion rejected");
            return Err(Error::IncompatibleQuantities {
                lhs: self.quantity_spec().to_string(),
                rhs: to.quantity_spec().to_string(),
            });
        }
        check_character::<T>(to.quantity_spec())?;
        sane_scaling::<T>(self.unit(), to.unit())?;
        let factor = self.unit().conversion_factor(to.unit())?;
        Ok(Quantity::new_unchecked(
            scale_into::<R, T>(self.value, &factor),
            to.clone(),
        ))
    }
}

/// `value * factor` computed exactly and converted to `T` with a single rounding.
fn scale_into<R: Scalar, T: Scalar + CastFrom<R>>(value: R, factor: &Magnitude) -> T {
    if factor.is_one() {
        return T::cast_from(value);
    }
    match (value.to_rational(), factor.to_ratio()) {
        (Some(value), Some(ratio)) => T::from_rational(&(value * ratio)),
        _ if T::FLOATING_POINT => T::cast_from(value).scale(factor),
        _ => T::from_f64(value.to_f64() * factor.value_f64()),
    }
}

impl<R: Representation + Add<Output = R>> Add for Quantity<R> {
    type Output = Result<Quantity<R>>;

    fn add(self, rhs: Quantity<R>) -> Self::Output {
        self.try_add(&rhs)
    }
}

impl<R: Representation + Add<Output = R>> Add for &Quantity<R> {
    type Output = Result<Quantity<R>>;

    fn add(self, rhs: &Quantity<R>) -> Self::Output {
        self.try_add(rhs)
    }
}

impl<R: Representation + Sub<Output = R>> Sub for Quantity<R> {
    type Output = Result<Quantity<R>>;

    fn sub(self, rhs: Quantity<R>) -> Self::Output {
        self.try_sub(&rhs)
    }
}

impl<R: Representation + Sub<Output = R>> Sub for &Quantity<R> {
    type Output = Result<Quantity<R>>;

    fn sub(self, rhs: &Quantity<R>) -> Self::Output {
        self.try_sub(rhs)
    }
}

impl<R: Representation + Neg<Output = R>> Neg for Quantity<R> {
    type Output = Quantity<R>;

    fn neg(self) -> Quantity<R> {
        Quantity::new_unchecked(-self.value, self.reference)
    }
}

impl<R: Representation + Mul<Output = R>> Mul for Quantity<R> {
    type Output = Quantity<R>;

    fn mul(self, rhs: Quantity<R>) -> Quantity<R> {
        Quantity::new_unchecked(self.value * rhs.value, self.reference.multiply(&rhs.reference))
    }
}

impl<R: Representation + Mul<Output = R>> Mul for &Quantity<R> {
    type Output = Quantity<R>;

    fn mul(self, rhs: &Quantity<R>) -> Quantity<R> {
        self.clone() * rhs.clone()
    }
}

impl<R: Representation + Div<Output = R>> Div for Quantity<R> {
    type Output = Quantity<R>;

    fn div(self, rhs: Quantity<R>) -> Quantity<R> {
        Quantity::new_unchecked(self.value / rhs.value, self.reference.divide(&rhs.reference))
    }
}

impl<R: Representation + Div<Output = R>> Div for &Quantity<R> {
    type Output = Quantity<R>;

    fn div(self, rhs: &Quantity<R>) -> Quantity<R> {
        self.clone() / rhs.clone()
    }
}

/// `value * unit` and friends; the reference must have a scalar character.
///
/// # Panics
/// When the representation cannot hold the reference's character.
fn from_operator<R: Representation>(value: R, reference: Reference) -> Quantity<R> {
    match Quantity::new(value, reference) {
        Ok(quantity) => quantity,
        Err(err) => panic!("{err}"),
    }
}

macro_rules! scalar_operators {
    ($($t:ty),*) => {$(
        impl Mul<&Unit> for $t {
            type Output = Quantity<$t>;

            fn mul(self, rhs: &Unit) -> Quantity<$t> {
                from_operator(self, Reference::from(rhs))
            }
        }

        impl Mul<Unit> for $t {
            type Output = Quantity<$t>;

            fn mul(self, rhs: Unit) -> Quantity<$t> {
                from_operator(self, Reference::from(&rhs))
            }
        }

        impl Mul<&Reference> for $t {
            type Output = Quantity<$t>;

            fn mul(self, rhs: &Reference) -> Quantity<$t> {
                from_operator(self, rhs.clone())
            }
        }

        impl Mul<Reference> for $t {
            type Output = Quantity<$t>;

            fn mul(self, rhs: Reference) -> Quantity<$t> {
                from_operator(self, rhs)
            }
        }

        impl Mul<$t> for Quantity<$t> {
            type Output = Quantity<$t>;

            fn mul(self, rhs: $t) -> Quantity<$t> {
                Quantity::new_unchecked(self.value * rhs, self.reference)
            }
        }

        impl Div<$t> for Quantity<$t> {
            type Output = Quantity<$t>;

            fn div(self, rhs: $t) -> Quantity<$t> {
                Quantity::new_unchecked(self.value / rhs, self.reference)
            }
        }

        impl<const N: usize> Mul<&Reference> for Vector<$t, N> {
            type Output = Quantity<Vector<$t, N>>;

            fn mul(self, rhs: &Reference) -> Quantity<Vector<$t, N>> {
                from_operator(self, rhs.clone())
            }
        }

        impl<const N: usize> Mul<$t> for Quantity<Vector<$t, N>> {
            type Output = Quantity<Vector<$t, N>>;

            fn mul(self, rhs: $t) -> Quantity<Vector<$t, N>> {
                Quantity::new_unchecked(self.value * rhs, self.reference)
            }
        }

        impl<const N: usize> Div<$t> for Quantity<Vector<$t, N>> {
            type Output = Quantity<Vector<$t, N>>;

            fn div(self, rhs: $t) -> Quantity<Vector<$t, N>> {
                Quantity::new_unchecked(self.value / rhs, self.reference)
            }
        }
    )*};
}

scalar_operators!(i8, i16, i32, i64, u8, u16, u32, u64, f32, f64);

#[cfg(feature = "decimal")]
scalar_operators!(Decimal);

impl<R: Representation> PartialEq for Quantity<R> {
    /// Compares in the common unit; unrelated quantities are never equal.
    fn eq(&self, other: &Self) -> bool {
        self.common_operands(other)
            .map_or(false, |(lhs, rhs, _)| lhs == rhs)
    }
}

impl<R: Representation + PartialOrd> PartialOrd for Quantity<R> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        let (lhs, rhs, _) = self.common_operands(other).ok()?;
        lhs.partial_cmp(&rhs)
    }
}

impl<R: Representation + fmt::Display> fmt::Display for Quantity<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let encoding = TextEncoding::from_formatter(f);
        fmt::Display::fmt(&self.value, f)?;
        if self.unit().is_one() {
            return Ok(());
        }
        write!(f, " {}", self.unit().render(encoding))
    }
}

impl<R: Representation> fmt::Debug for Quantity<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} {:?}", self.value, self.reference)
    }
}

#[cfg(feature = "serde")]
impl<R: Representation + serde::Serialize> serde::Serialize for Quantity<R> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        use serde::ser::SerializeStruct;

        let mut state = serializer.serialize_struct("Quantity", 3)?;
        state.serialize_field("value", &self.value)?;
        state.serialize_field("unit", &self.unit().to_string())?;
        state.serialize_field("quantity_spec", &self.quantity_spec().to_string())?;
        state.end()
    }
}
