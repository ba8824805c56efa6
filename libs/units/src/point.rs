//! Point origins and quantity points.
//!
//! A [`QuantityPoint`] is a quantity measured from a [`PointOrigin`]. Origins
//! form chains: an absolute origin is a fixed reference, a relative origin
//! sits at a known offset from another origin. Points whose chains end at the
//! same absolute origin can be rebased onto each other and subtracted.

use crate::cast::{implicit_scaling, sane_scaling};
use crate::error::{Error, Result};
use crate::magnitude::Magnitude;
use crate::quantity::{check_character, Quantity};
use crate::quantity_spec::QuantitySpec;
use crate::reference::Reference;
use crate::repr::{CastFrom, Representation, Scalar};
use crate::symbol::{next_declaration_id, SymbolText};
use crate::unit::Unit;
use num_rational::BigRational;
use num_traits::{ToPrimitive, Zero};
use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Sub};
use std::sync::Arc;

struct AbsoluteOrigin {
    id: u64,
    name: SymbolText,
    spec: QuantitySpec,
}

struct RelativeOrigin {
    id: u64,
    name: SymbolText,
    base: PointOrigin,
    /// Offset from `base`, in the canonical magnitude of the offset's unit.
    offset: BigRational,
    offset_display: String,
}

#[derive(Clone)]
enum Origin {
    Absolute(Arc<AbsoluteOrigin>),
    Relative(Arc<RelativeOrigin>),
    /// Implicit origin of points created straight from a quantity.
    Zeroth(QuantitySpec),
}

#[derive(Clone)]
pub struct PointOrigin(Origin);

fn magnitude_ratio(magnitude: &Magnitude) -> Option<BigRational> {
    magnitude
        .to_ratio()
        .or_else(|| BigRational::from_float(magnitude.value_f64()))
}

impl PointOrigin {
    /// A fixed reference point such as absolute zero.
    pub fn absolute(name: impl Into<SymbolText>, spec: &QuantitySpec) -> Self {
        Self(Origin::Absolute(Arc::new(AbsoluteOrigin {
            id: next_declaration_id(),
            name: name.into(),
            spec: spec.strip_kind().clone(),
        })))
    }

    /// An origin `offset` away from `base`, such as the ice point at 273.15 K.
    pub fn relative<R: Scalar>(
        name: impl Into<SymbolText>,
        base: &PointOrigin,
        offset: &Quantity<R>,
    ) -> Result<Self> {
        let name = name.into();
        if base.quantity_spec().dimension().expansion() != offset.dimension().expansion() {
            return Err(Error::IncompatibleQuantities {
                lhs: base.quantity_spec().to_string(),
                rhs: offset.quantity_spec().to_string(),
            });
        }
        let invalid = |message: &'static str| Error::InvalidDeclaration {
            name: name.unicode().to_string(),
            message,
        };
        let value = offset
            .numerical_value_ref()
            .to_rational()
            .ok_or_else(|| invalid("origin offsets must be finite"))?;
        let scale = magnitude_ratio(&offset.unit().canonical().magnitude)
            .ok_or_else(|| invalid("origin offsets need a finite unit magnitude"))?;
        tracing::trace!(origin = %name, base = %base, offset = %offset, "declared relative origin");
        Ok(Self(Origin::Relative(Arc::new(RelativeOrigin {
            id: next_declaration_id(),
            name,
            base: base.clone(),
            offset: value * scale,
            offset_display: offset.to_string(),
        }))))
    }

    /// The implicit origin of points of `spec` that were never given one.
    pub fn zeroth(spec: &QuantitySpec) -> Self {
        Self(Origin::Zeroth(spec.kind_root()))
    }

    pub fn name(&self) -> String {
        match &self.0 {
            Origin::Absolute(origin) => origin.name.to_string(),
            Origin::Relative(origin) => origin.name.to_string(),
            Origin::Zeroth(spec) => format!("zeroth<{spec}>"),
        }
    }

    pub fn quantity_spec(&self) -> QuantitySpec {
        match &self.0 {
            Origin::Absolute(origin) => origin.spec.clone(),
            Origin::Relative(origin) => origin.base.quantity_spec(),
            Origin::Zeroth(spec) => spec.clone(),
        }
    }

    pub fn is_absolute(&self) -> bool {
        !matches!(self.0, Origin::Relative(_))
    }

    /// The absolute origin the relative chain ends at.
    pub fn absolute_root(&self) -> PointOrigin {
        match &self.0 {
            Origin::Relative(origin) => origin.base.absolute_root(),
            _ => self.clone(),
        }
    }

    pub fn same_absolute_origin(&self, other: &PointOrigin) -> bool {
        self.absolute_root() == other.absolute_root()
    }

    /// Offset from the absolute root in canonical units.
    fn offset_from_root(&self) -> BigRational {
        match &self.0 {
            Origin::Relative(origin) => &origin.offset + origin.base.offset_from_root(),
            _ => BigRational::zero(),
        }
    }

    /// Canonical offset of `self` relative to `other`; both must share a root.
    fn offset_to(&self, other: &PointOrigin) -> Result<BigRational> {
        if !self.same_absolute_origin(other) {
            tracing::debug!(lhs = %self, rhs = %other, "origins have different absolute roots");
            return Err(Error::UnrelatedOrigins {
                lhs: self.to_string(),
                rhs: other.to_string(),
            });
        }
        Ok(self.offset_from_root() - other.offset_from_root())
    }
}

impl PartialEq for PointOrigin {
    fn eq(&self, other: &Self) -> bool {
        match (&self.0, &other.0) {
            (Origin::Absolute(a), Origin::Absolute(b)) => a.id == b.id,
            (Origin::Relative(a), Origin::Relative(b)) => a.id == b.id,
            (Origin::Zeroth(a), Origin::Zeroth(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for PointOrigin {}

impl fmt::Display for PointOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

impl fmt::Debug for PointOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Origin::Relative(origin) => {
                write!(f, "{} ({} + {})", origin.name, origin.base, origin.offset_display)
            }
            _ => f.write_str(&self.name()),
        }
    }
}

/// Value of `value [from]` plus a canonical `offset`, expressed in `to`.
fn shift<R: Scalar, T: Scalar>(value: R, from: &Unit, offset: &BigRational, to: &Unit) -> T {
    let (from_mag, to_mag) = (from.canonical().magnitude, to.canonical().magnitude);
    let exact = value.to_rational().and_then(|value| {
        let from = magnitude_ratio(&from_mag)?;
        let to = magnitude_ratio(&to_mag)?;
        (!to.is_zero()).then(|| (value * from + offset) / to)
    });
    match exact {
        Some(exact) => T::from_rational(&exact),
        None => {
            let offset = offset.to_f64().unwrap_or(0.0);
            T::from_f64((value.to_f64() * from_mag.value_f64() + offset) / to_mag.value_f64())
        }
    }
}

/// A quantity measured from a point origin.
#[derive(Clone)]
pub struct QuantityPoint<R = f64> {
    quantity: Quantity<R>,
    origin: PointOrigin,
}

impl<R: Representation> QuantityPoint<R> {
    pub fn new(quantity: Quantity<R>, origin: &PointOrigin) -> Result<Self> {
        let spec = origin.quantity_spec();
        if spec.dimension().expansion() != quantity.dimension().expansion() {
            return Err(Error::IncompatibleQuantities {
                lhs: spec.to_string(),
                rhs: quantity.quantity_spec().to_string(),
            });
        }
        Ok(Self {
            quantity,
            origin: origin.clone(),
        })
    }

    /// Point at the unit's default origin, or at the zeroth origin of the
    /// quantity's kind.
    pub fn from_quantity(quantity: Quantity<R>) -> Self {
        let origin = quantity
            .unit()
            .point_origin()
            .unwrap_or_else(|| PointOrigin::zeroth(quantity.quantity_spec()));
        Self { quantity, origin }
    }

    pub fn quantity_from_origin(&self) -> &Quantity<R> {
        &self.quantity
    }

    pub fn into_quantity_from_origin(self) -> Quantity<R> {
        self.quantity
    }

    pub fn point_origin(&self) -> &PointOrigin {
        &self.origin
    }

    pub fn reference(&self) -> &Reference {
        self.quantity.reference()
    }

    pub fn unit(&self) -> &Unit {
        self.quantity.unit()
    }

    pub fn quantity_spec(&self) -> &QuantitySpec {
        self.quantity.quantity_spec()
    }

    /// Same origin, different unit; implicit rules apply.
    pub fn in_unit(&self, unit: &Unit) -> Result<Self> {
        Ok(Self {
            quantity: self.quantity.in_unit(unit)?,
            origin: self.origin.clone(),
        })
    }

    pub fn value_cast(&self, unit: &Unit) -> Result<Self> {
        Ok(Self {
            quantity: self.quantity.value_cast(unit)?,
            origin: self.origin.clone(),
        })
    }

    pub fn value_cast_rep<T>(&self) -> Result<QuantityPoint<T>>
    where
        T: Representation + CastFrom<R>,
    {
        Ok(QuantityPoint {
            quantity: self.quantity.value_cast_rep()?,
            origin: self.origin.clone(),
        })
    }

    pub fn try_add(&self, offset: &Quantity<R>) -> Result<Self>
    where
        R: Add<Output = R>,
    {
        Ok(Self {
            quantity: self.quantity.try_add(offset)?,
            origin: self.origin.clone(),
        })
    }

    pub fn try_sub_quantity(&self, offset: &Quantity<R>) -> Result<Self>
    where
        R: Sub<Output = R>,
    {
        Ok(Self {
            quantity: self.quantity.try_sub(offset)?,
            origin: self.origin.clone(),
        })
    }
}

impl<R: Scalar> QuantityPoint<R> {
    /// Displacement of this point from `origin`, in this point's unit.
    pub fn quantity_from(&self, origin: &PointOrigin) -> Result<Quantity<R>> {
        if *origin == self.origin {
            return Ok(self.quantity.clone());
        }
        let offset = self.origin.offset_to(origin)?;
        let unit = self.unit();
        Ok(Quantity::new_unchecked(
            shift(*self.quantity.numerical_value_ref(), unit, &offset, unit),
            self.reference().clone(),
        ))
    }

    /// Displacement from the absolute origin at the root of this point's chain.
    pub fn quantity_from_zero(&self) -> Quantity<R> {
        let root = self.origin.absolute_root();
        let offset = self.origin.offset_from_root();
        let unit = self.unit();
        if offset.is_zero() && root == self.origin {
            return self.quantity.clone();
        }
        Quantity::new_unchecked(
            shift(*self.quantity.numerical_value_ref(), unit, &offset, unit),
            self.reference().clone(),
        )
    }

    /// The same point expressed relative to `origin`.
    pub fn point_for(&self, origin: &PointOrigin) -> Result<Self> {
        Ok(Self {
            quantity: self.quantity_from(origin)?,
            origin: origin.clone(),
        })
    }

    /// Moves the point to `origin` and `unit` under implicit rules. For
    /// integral representations the origin offset must be a whole number of
    /// `unit`; otherwise use [`QuantityPoint::value_cast_point`].
    pub fn convert_to(&self, unit: &Unit, origin: &PointOrigin) -> Result<Self> {
        let target = self.quantity.target_reference(unit, false)?;
        implicit_scaling::<R, R>(self.unit(), unit)?;
        let offset = self.origin.offset_to(origin)?;
        if !R::FLOATING_POINT {
            let whole = magnitude_ratio(&unit.canonical().magnitude)
                .filter(|scale| !scale.is_zero())
                .map_or(false, |scale| (&offset / scale).is_integer());
            if !whole {
                tracing::debug!(from = %self.origin, to = %origin, rep = R::type_name(), "origin offset is not whole");
                return Err(Error::TruncatingConversion {
                    from: format!("{} ({})", self.unit(), self.origin),
                    to: format!("{unit} ({origin})"),
                    rep: R::type_name(),
                });
            }
        }
        Ok(Self {
            quantity: Quantity::new_unchecked(
                shift(*self.quantity.numerical_value_ref(), self.unit(), &offset, unit),
                target,
            ),
            origin: origin.clone(),
        })
    }

    /// Explicit conversion to another reference, representation and origin,
    /// rounded once.
    pub fn value_cast_point<T>(&self, to: &Reference, origin: &PointOrigin) -> Result<QuantityPoint<T>>
    where
        T: Scalar + CastFrom<R>,
    {
        if !self.quantity_spec().explicitly_convertible(to.quantity_spec()) {
            return Err(Error::IncompatibleQuantities {
                lhs: self.quantity_spec().to_string(),
                rhs: to.quantity_spec().to_string(),
            });
        }
        check_character::<T>(to.quantity_spec())?;
        sane_scaling::<T>(self.unit(), to.unit())?;
        let offset = self.origin.offset_to(origin)?;
        Ok(QuantityPoint {
            quantity: Quantity::new_unchecked(
                shift(*self.quantity.numerical_value_ref(), self.unit(), &offset, to.unit()),
                to.clone(),
            ),
            origin: origin.clone(),
        })
    }

    /// Distance between two points sharing an absolute origin.
    pub fn try_sub_point(&self, other: &QuantityPoint<R>) -> Result<Quantity<R>> {
        let rebased = other.quantity_from(&self.origin)?;
        self.quantity.try_sub(&rebased)
    }
}

impl<R: Representation> Quantity<R> {
    /// This quantity as a point from the unit's default origin.
    pub fn into_point(self) -> QuantityPoint<R> {
        QuantityPoint::from_quantity(self)
    }
}

impl<R: Representation + Add<Output = R>> Add<Quantity<R>> for QuantityPoint<R> {
    type Output = Result<QuantityPoint<R>>;

    fn add(self, rhs: Quantity<R>) -> Self::Output {
        self.try_add(&rhs)
    }
}

impl<R: Representation + Sub<Output = R>> Sub<Quantity<R>> for QuantityPoint<R> {
    type Output = Result<QuantityPoint<R>>;

    fn sub(self, rhs: Quantity<R>) -> Self::Output {
        self.try_sub_quantity(&rhs)
    }
}

impl<R: Scalar> Sub for QuantityPoint<R> {
    type Output = Result<Quantity<R>>;

    fn sub(self, rhs: QuantityPoint<R>) -> Self::Output {
        self.try_sub_point(&rhs)
    }
}

impl<R: Scalar> Sub for &QuantityPoint<R> {
    type Output = Result<Quantity<R>>;

    fn sub(self, rhs: &QuantityPoint<R>) -> Self::Output {
        self.try_sub_point(rhs)
    }
}

/// `origin + quantity` places a point.
impl<R: Representation> Add<Quantity<R>> for &PointOrigin {
    type Output = Result<QuantityPoint<R>>;

    fn add(self, rhs: Quantity<R>) -> Self::Output {
        QuantityPoint::new(rhs, self)
    }
}

impl<R: Scalar> PartialEq for QuantityPoint<R> {
    fn eq(&self, other: &Self) -> bool {
        self.try_sub_point(other)
            .map_or(false, |distance| *distance.numerical_value_ref() == R::zero())
    }
}

impl<R: Scalar> PartialOrd for QuantityPoint<R> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        let distance = self.try_sub_point(other).ok()?;
        distance.numerical_value_ref().partial_cmp(&R::zero())
    }
}

impl<R: Representation + fmt::Display> fmt::Display for QuantityPoint<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.quantity, f)?;
        if matches!(self.origin.0, Origin::Zeroth(_)) || self.unit().point_origin().as_ref() == Some(&self.origin) {
            return Ok(());
        }
        write!(f, " ({})", self.origin)
    }
}

impl<R: Representation> fmt::Debug for QuantityPoint<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} from {:?}", self.quantity, self.origin)
    }
}

#[cfg(feature = "serde")]
impl<R: Representation + serde::Serialize> serde::Serialize for QuantityPoint<R> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        use serde::ser::SerializeStruct;

        let mut state = serializer.serialize_struct("QuantityPoint", 3)?;
        state.serialize_field("quantity_from_origin", &self.quantity)?;
        state.serialize_field("origin", &self.origin.name())?;
        state.serialize_field("quantity_spec", &self.quantity_spec().to_string())?;
        state.end()
    }
}
