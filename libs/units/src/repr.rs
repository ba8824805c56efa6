//! Numeric representations a quantity can store.
//!
//! [`Representation`] states what the cast engine needs to know about a type:
//! the quantity character it can hold, whether it is floating point, its
//! largest value and how to scale it by an exact [`Magnitude`]. [`Scalar`]
//! adds exact rational round-tripping used for rounding and origin rebasing.

use crate::magnitude::Magnitude;
use crate::quantity_spec::QuantityCharacter;
use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{Float, FromPrimitive, Signed, ToPrimitive};
use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};

#[cfg(feature = "decimal")]
use rust_decimal::Decimal;

/// Largest finite value of a representation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Limit {
    Integer(u128),
    Float(f64),
}

pub trait Representation: Clone + PartialEq + fmt::Debug + Send + Sync + 'static {
    /// Character of the quantities this type can represent.
    const CHARACTER: QuantityCharacter;
    /// True when scaling down never truncates.
    const FLOATING_POINT: bool;

    fn type_name() -> &'static str;

    fn max_value() -> Option<Limit>;

    fn zero() -> Self;

    /// Multiplies by `factor`. Integers truncate toward zero; values outside
    /// the representable range saturate.
    fn scale(&self, factor: &Magnitude) -> Self;
}

/// A one-dimensional number.
pub trait Scalar:
    Representation
    + Copy
    + PartialOrd
    + fmt::Display
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
{
    /// Exact value; `None` for NaN and infinities.
    fn to_rational(self) -> Option<BigRational>;

    /// Nearest value toward zero, saturating at the type's bounds.
    fn from_rational(value: &BigRational) -> Self;

    fn to_f64(self) -> f64;

    /// Saturating conversion; NaN becomes zero for non-floating types.
    fn from_f64(value: f64) -> Self;

    /// Smallest `x` such that `1 + x != 1`; zero for integers.
    fn epsilon() -> Self;

    fn one() -> Self;
}

/// Explicit, possibly lossy, conversion between representations.
pub trait CastFrom<T> {
    fn cast_from(value: T) -> Self;
}

/// Representation change allowed without an explicit cast: lossless widening,
/// or conversion into a floating type where only precision may be lost.
///
/// Returns `None` when the value does not fit the target.
pub trait ImplicitFrom<T>: Sized {
    fn implicit_from(value: T) -> Option<Self>;
}

macro_rules! impl_integer {
    ($($t:ty),*) => {$(
        impl Representation for $t {
            const CHARACTER: QuantityCharacter = QuantityCharacter::Scalar;
            const FLOATING_POINT: bool = false;

            fn type_name() -> &'static str {
                stringify!($t)
            }

            fn max_value() -> Option<Limit> {
                Some(Limit::Integer(<$t>::MAX as u128))
            }

            fn zero() -> Self {
                0
            }

            fn scale(&self, factor: &Magnitude) -> Self {
                match factor.to_ratio() {
                    Some(ratio) => Scalar::from_rational(&(ratio * BigInt::from(*self))),
                    None => Scalar::from_f64(*self as f64 * factor.value_f64()),
                }
            }
        }

        impl Scalar for $t {
            fn to_rational(self) -> Option<BigRational> {
                Some(BigRational::from_integer(BigInt::from(self)))
            }

            fn from_rational(value: &BigRational) -> Self {
                let whole = value.trunc().to_integer();
                <$t>::try_from(&whole).unwrap_or(if whole.is_negative() {
                    <$t>::MIN
                } else {
                    <$t>::MAX
                })
            }

            fn to_f64(self) -> f64 {
                self as f64
            }

            fn from_f64(value: f64) -> Self {
                value as $t
            }

            fn epsilon() -> Self {
                0
            }

            fn one() -> Self {
                1
            }
        }
    )*};
}

impl_integer!(i8, i16, i32, i64, u8, u16, u32, u64);

fn scale_float<F: Float + FromPrimitive>(value: F, factor: &Magnitude) -> F {
    let as_float = |n: num_bigint::BigUint| n.to_f64().and_then(F::from_f64).unwrap_or_else(F::infinity);
    if factor.is_integral() {
        value * as_float(factor.numerator())
    } else if factor.is_rational() && factor.numerator() == num_bigint::BigUint::from(1u8) {
        value / as_float(factor.denominator())
    } else if factor.is_rational() {
        value * as_float(factor.numerator()) / as_float(factor.denominator())
    } else {
        value * F::from_f64(factor.value_f64()).unwrap_or_else(F::infinity)
    }
}

macro_rules! impl_float {
    ($($t:ty),*) => {$(
        impl Representation for $t {
            const CHARACTER: QuantityCharacter = QuantityCharacter::Scalar;
            const FLOATING_POINT: bool = true;

            fn type_name() -> &'static str {
                stringify!($t)
            }

            fn max_value() -> Option<Limit> {
                Some(Limit::Float(<$t>::MAX as f64))
            }

            fn zero() -> Self {
                0.0
            }

            fn scale(&self, factor: &Magnitude) -> Self {
                scale_float(*self, factor)
            }
        }

        impl Scalar for $t {
            fn to_rational(self) -> Option<BigRational> {
                BigRational::from_float(self)
            }

            fn from_rational(value: &BigRational) -> Self {
                match value.to_f64() {
                    Some(v) => v as $t,
                    None if value.is_negative() => <$t>::NEG_INFINITY,
                    None => <$t>::INFINITY,
                }
            }

            fn to_f64(self) -> f64 {
                self as f64
            }

            fn from_f64(value: f64) -> Self {
                value as $t
            }

            fn epsilon() -> Self {
                <$t>::EPSILON
            }

            fn one() -> Self {
                1.0
            }
        }
    )*};
}

impl_float!(f32, f64);

macro_rules! cast_between {
    ($from:ty => $($to:ty),*) => {$(
        impl CastFrom<$from> for $to {
            fn cast_from(value: $from) -> Self {
                value as $to
            }
        }
    )*};
}

macro_rules! cast_primitives {
    ($($from:ty),*) => {$(
        cast_between!($from => i8, i16, i32, i64, u8, u16, u32, u64, f32, f64);
    )*};
}

cast_primitives!(i8, i16, i32, i64, u8, u16, u32, u64, f32, f64);

macro_rules! implicit_widening {
    ($from:ty => $($to:ty),*) => {$(
        impl ImplicitFrom<$from> for $to {
            fn implicit_from(value: $from) -> Option<Self> {
                Some(<$to>::from(value))
            }
        }
    )*};
}

implicit_widening!(i8 => i8, i16, i32, i64);
implicit_widening!(i16 => i16, i32, i64);
implicit_widening!(i32 => i32, i64);
implicit_widening!(i64 => i64);
implicit_widening!(u8 => u8, u16, u32, u64, i16, i32, i64);
implicit_widening!(u16 => u16, u32, u64, i32, i64);
implicit_widening!(u32 => u32, u64, i64);
implicit_widening!(u64 => u64);
implicit_widening!(f32 => f32, f64);
implicit_widening!(f64 => f64);

macro_rules! implicit_to_float {
    ($($from:ty),*) => {$(
        impl ImplicitFrom<$from> for f32 {
            fn implicit_from(value: $from) -> Option<Self> {
                Some(value as f32)
            }
        }

        impl ImplicitFrom<$from> for f64 {
            fn implicit_from(value: $from) -> Option<Self> {
                Some(value as f64)
            }
        }
    )*};
}

implicit_to_float!(i8, i16, i32, i64, u8, u16, u32, u64);

impl ImplicitFrom<f64> for f32 {
    fn implicit_from(value: f64) -> Option<Self> {
        let narrowed = value as f32;
        (narrowed.is_finite() || !value.is_finite()).then_some(narrowed)
    }
}

#[cfg(feature = "decimal")]
mod decimal {
    use super::*;

    fn saturated(negative: bool) -> Decimal {
        if negative {
            Decimal::MIN
        } else {
            Decimal::MAX
        }
    }

    impl Representation for Decimal {
        const CHARACTER: QuantityCharacter = QuantityCharacter::Scalar;
        // Fractional results are exact up to 28 digits, so downscaling does not truncate.
        const FLOATING_POINT: bool = true;

        fn type_name() -> &'static str {
            "Decimal"
        }

        fn max_value() -> Option<Limit> {
            Some(Limit::Integer(Decimal::MAX.mantissa() as u128))
        }

        fn zero() -> Self {
            Decimal::ZERO
        }

        fn scale(&self, factor: &Magnitude) -> Self {
            match (Scalar::to_rational(*self), factor.to_ratio()) {
                (Some(value), Some(ratio)) => Scalar::from_rational(&(value * ratio)),
                _ => Scalar::from_f64(Scalar::to_f64(*self) * factor.value_f64()),
            }
        }
    }

    impl Scalar for Decimal {
        fn to_rational(self) -> Option<BigRational> {
            Some(BigRational::new(
                BigInt::from(self.mantissa()),
                BigInt::from(10u32).pow(self.scale()),
            ))
        }

        fn from_rational(value: &BigRational) -> Self {
            let limit = BigInt::from(Decimal::MAX.mantissa());
            for scale in (0..=28u32).rev() {
                let shifted = value * BigRational::from_integer(BigInt::from(10u32).pow(scale));
                let mantissa = shifted.trunc().to_integer();
                if mantissa.abs() <= limit {
                    if let Some(mantissa) = mantissa.to_i128() {
                        return Decimal::from_i128_with_scale(mantissa, scale).normalize();
                    }
                }
            }
            saturated(value.is_negative())
        }

        fn to_f64(self) -> f64 {
            ToPrimitive::to_f64(&self).unwrap_or(0.0)
        }

        fn from_f64(value: f64) -> Self {
            if value.is_nan() {
                return Decimal::ZERO;
            }
            <Decimal as FromPrimitive>::from_f64(value).unwrap_or_else(|| saturated(value < 0.0))
        }

        fn epsilon() -> Self {
            Decimal::new(1, 28)
        }

        fn one() -> Self {
            Decimal::ONE
        }
    }

    macro_rules! cast_decimal_integer {
        ($($t:ty),*) => {$(
            impl CastFrom<$t> for Decimal {
                fn cast_from(value: $t) -> Self {
                    Decimal::from(value)
                }
            }
        )*};
    }

    cast_decimal_integer!(i8, i16, i32, i64, u8, u16, u32, u64);

    impl CastFrom<f32> for Decimal {
        fn cast_from(value: f32) -> Self {
            <Decimal as Scalar>::from_f64(f64::from(value))
        }
    }

    impl CastFrom<f64> for Decimal {
        fn cast_from(value: f64) -> Self {
            <Decimal as Scalar>::from_f64(value)
        }
    }

    impl CastFrom<Decimal> for Decimal {
        fn cast_from(value: Decimal) -> Self {
            value
        }
    }

    macro_rules! implicit_decimal {
        ($($t:ty),*) => {$(
            impl ImplicitFrom<$t> for Decimal {
                fn implicit_from(value: $t) -> Option<Self> {
                    Some(Decimal::from(value))
                }
            }
        )*};
    }

    implicit_decimal!(i8, i16, i32, i64, u8, u16, u32, u64);

    impl ImplicitFrom<Decimal> for Decimal {
        fn implicit_from(value: Decimal) -> Option<Self> {
            Some(value)
        }
    }

    macro_rules! cast_from_decimal {
        ($($t:ty),*) => {$(
            impl CastFrom<Decimal> for $t {
                fn cast_from(value: Decimal) -> Self {
                    match Scalar::to_rational(value) {
                        Some(exact) => <$t as Scalar>::from_rational(&exact),
                        None => <$t as Representation>::zero(),
                    }
                }
            }
        )*};
    }

    cast_from_decimal!(i8, i16, i32, i64, u8, u16, u32, u64, f32, f64);
}

/// Fixed-size vector representation for vector quantities.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vector<T, const N: usize>(pub [T; N]);

impl<T: Scalar, const N: usize> Vector<T, N> {
    pub fn components(&self) -> &[T; N] {
        &self.0
    }

    /// Euclidean norm, computed in `f64`.
    pub fn norm(&self) -> f64 {
        self.0
            .iter()
            .map(|c| {
                let c = c.to_f64();
                c * c
            })
            .sum::<f64>()
            .sqrt()
    }
}

impl<T: Scalar, const N: usize> Representation for Vector<T, N> {
    const CHARACTER: QuantityCharacter = QuantityCharacter::Vector;
    const FLOATING_POINT: bool = T::FLOATING_POINT;

    fn type_name() -> &'static str {
        "Vector"
    }

    fn max_value() -> Option<Limit> {
        T::max_value()
    }

    fn zero() -> Self {
        Vector([T::zero(); N])
    }

    fn scale(&self, factor: &Magnitude) -> Self {
        Vector(self.0.map(|c| c.scale(factor)))
    }
}

impl<T: Scalar, const N: usize> Add for Vector<T, N> {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        let mut out = self.0;
        for (lhs, rhs) in out.iter_mut().zip(rhs.0) {
            *lhs = *lhs + rhs;
        }
        Vector(out)
    }
}

impl<T: Scalar, const N: usize> Sub for Vector<T, N> {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        let mut out = self.0;
        for (lhs, rhs) in out.iter_mut().zip(rhs.0) {
            *lhs = *lhs - rhs;
        }
        Vector(out)
    }
}

impl<T: Scalar + Neg<Output = T>, const N: usize> Neg for Vector<T, N> {
    type Output = Self;

    fn neg(self) -> Self {
        Vector(self.0.map(|c| -c))
    }
}

impl<T: Scalar, const N: usize> Mul<T> for Vector<T, N> {
    type Output = Self;

    fn mul(self, rhs: T) -> Self {
        Vector(self.0.map(|c| c * rhs))
    }
}

impl<T: Scalar, const N: usize> Div<T> for Vector<T, N> {
    type Output = Self;

    fn div(self, rhs: T) -> Self {
        Vector(self.0.map(|c| c / rhs))
    }
}

impl<T, U, const N: usize> CastFrom<Vector<U, N>> for Vector<T, N>
where
    T: CastFrom<U>,
{
    fn cast_from(value: Vector<U, N>) -> Self {
        Vector(value.0.map(T::cast_from))
    }
}

impl<T, U, const N: usize> ImplicitFrom<Vector<U, N>> for Vector<T, N>
where
    T: Scalar + ImplicitFrom<U>,
{
    fn implicit_from(value: Vector<U, N>) -> Option<Self> {
        let components = value.0.map(T::implicit_from);
        if components.iter().any(Option::is_none) {
            return None;
        }
        Some(Vector(components.map(|c| c.unwrap_or_else(T::zero))))
    }
}

impl<T: fmt::Display, const N: usize> fmt::Display for Vector<T, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, c) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{c}")?;
        }
        f.write_str("]")
    }
}
