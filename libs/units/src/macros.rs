//! Declaration macros for systems of units.
//!
//! Each macro expands to a `static` initialised on first use. The builders
//! underneath return `Result`; a declaration that fails panics on first use
//! with the builder's diagnostic.
//!
//! ```
//! use ferrum_units::{base_dimension, named_unit, prefix, quantity_spec, mag};
//!
//! base_dimension!(pub DIM_LENGTH = "L");
//! quantity_spec!(pub LENGTH = base("length", DIM_LENGTH).is_kind());
//! quantity_spec!(pub WIDTH = child("width", LENGTH));
//! named_unit!(pub METRE = "m", base(LENGTH));
//! prefix!(pub KILO = "k", mag(1000));
//! named_unit!(pub KILOMETRE = prefixed(KILO, METRE));
//!
//! let width = 2i32 * &*KILOMETRE;
//! assert_eq!(width.to_string(), "2 km");
//! ```

use crate::error::Result;

#[doc(hidden)]
pub mod __private {
    pub use once_cell::sync::Lazy;

    /// Unwraps a declaration result.
    ///
    /// # Panics
    /// When the declaration is invalid.
    pub fn declared<T>(name: &str, result: super::Result<T>) -> T {
        match result {
            Ok(value) => value,
            Err(err) => panic!("invalid declaration `{name}`: {err}"),
        }
    }
}

/// `base_dimension!(pub DIM_LENGTH = "L");`
#[macro_export]
macro_rules! base_dimension {
    ($(#[$meta:meta])* $vis:vis $name:ident = $symbol:expr) => {
        $(#[$meta])*
        $vis static $name: $crate::macros::__private::Lazy<$crate::Dimension> =
            $crate::macros::__private::Lazy::new(|| $crate::Dimension::base($symbol));
    };
}

/// `named_dimension!(pub DIM_FORCE = "F", &*DIM_MASS * &*DIM_ACCELERATION);`
#[macro_export]
macro_rules! named_dimension {
    ($(#[$meta:meta])* $vis:vis $name:ident = $symbol:expr, $definition:expr) => {
        $(#[$meta])*
        $vis static $name: $crate::macros::__private::Lazy<$crate::Dimension> =
            $crate::macros::__private::Lazy::new(|| $crate::Dimension::named($symbol, &$definition));
    };
}

/// Declares a named quantity spec through [`QuantitySpec::base`],
/// [`QuantitySpec::child`] or [`QuantitySpec::derived`], followed by any
/// builder modifiers. Modifier arguments are passed by reference.
///
/// [`QuantitySpec::base`]: crate::QuantitySpec::base
/// [`QuantitySpec::child`]: crate::QuantitySpec::child
/// [`QuantitySpec::derived`]: crate::QuantitySpec::derived
#[macro_export]
macro_rules! quantity_spec {
    ($(#[$meta:meta])* $vis:vis $name:ident =
        $kind:ident($text:expr, $arg:expr) $(. $modifier:ident($($value:expr),*))*) => {
        $(#[$meta])*
        $vis static $name: $crate::macros::__private::Lazy<$crate::QuantitySpec> =
            $crate::macros::__private::Lazy::new(|| {
                $crate::macros::__private::declared(
                    stringify!($name),
                    $crate::QuantitySpec::$kind($text, &$arg)
                        $(.$modifier($(&$value),*))*
                        .build(),
                )
            });
    };
}

/// Declares a named unit, either from [`UnitBuilder`] steps or by applying a
/// [`Prefix`] static to another unit.
///
/// `named_unit!(pub HERTZ = "Hz", defined_as(SECOND.invert()), kind(FREQUENCY));`
///
/// [`UnitBuilder`]: crate::UnitBuilder
/// [`Prefix`]: crate::Prefix
#[macro_export]
macro_rules! named_unit {
    ($(#[$meta:meta])* $vis:vis $name:ident = prefixed($prefix:expr, $unit:expr)) => {
        $(#[$meta])*
        $vis static $name: $crate::macros::__private::Lazy<$crate::Unit> =
            $crate::macros::__private::Lazy::new(|| $crate::Prefix::apply(&$prefix, &$unit));
    };
    ($(#[$meta:meta])* $vis:vis $name:ident = $symbol:expr, $($step:ident($value:expr)),+) => {
        $(#[$meta])*
        $vis static $name: $crate::macros::__private::Lazy<$crate::Unit> =
            $crate::macros::__private::Lazy::new(|| {
                $crate::macros::__private::declared(
                    stringify!($name),
                    $crate::Unit::builder($symbol)$(.$step(&$value))+.build(),
                )
            });
    };
}

/// `prefix!(pub KILO = "k", mag(1000));`
#[macro_export]
macro_rules! prefix {
    ($(#[$meta:meta])* $vis:vis $name:ident = $symbol:expr, $magnitude:expr) => {
        $(#[$meta])*
        $vis static $name: $crate::macros::__private::Lazy<$crate::Prefix> =
            $crate::macros::__private::Lazy::new(|| $crate::Prefix::new($symbol, $magnitude));
    };
}

/// `absolute_point_origin!(pub ABSOLUTE_ZERO = "absolute_zero", THERMODYNAMIC_TEMPERATURE);`
#[macro_export]
macro_rules! absolute_point_origin {
    ($(#[$meta:meta])* $vis:vis $name:ident = $text:expr, $spec:expr) => {
        $(#[$meta])*
        $vis static $name: $crate::macros::__private::Lazy<$crate::PointOrigin> =
            $crate::macros::__private::Lazy::new(|| $crate::PointOrigin::absolute($text, &$spec));
    };
}

/// `relative_point_origin!(pub ICE_POINT = "ice_point", ABSOLUTE_ZERO, 273_150 * &*MILLIKELVIN);`
#[macro_export]
macro_rules! relative_point_origin {
    ($(#[$meta:meta])* $vis:vis $name:ident = $text:expr, $base:expr, $offset:expr) => {
        $(#[$meta])*
        $vis static $name: $crate::macros::__private::Lazy<$crate::PointOrigin> =
            $crate::macros::__private::Lazy::new(|| {
                $crate::macros::__private::declared(
                    stringify!($name),
                    $crate::PointOrigin::relative($text, &$base, &$offset),
                )
            });
    };
}
