//! Quantity construction, conversion and arithmetic.

use ferrum_units::{mag, Error, Quantity, Reference, SpecConvertibility, Vector};

mod test_support;
use test_support::*;

#[test]
fn test_value_times_unit() {
    let d = 2i32 * &*KILOMETRE;
    assert_eq!(*d.numerical_value_ref(), 2);
    assert_eq!(d.unit(), &*KILOMETRE);
    assert_eq!(d.quantity_spec(), &LENGTH.kind_of());
    assert_eq!(d.to_string(), "2 km");
}

#[test]
fn test_implicit_conversion_to_a_finer_unit() {
    let d = 2i32 * &*KILOMETRE;
    let m = d.in_unit(&METRE).unwrap();
    assert_eq!(*m.numerical_value_ref(), 2000);
    assert_eq!(d.numerical_value_in(&METRE).unwrap(), 2000);
    assert_eq!((2.5f64 * &*KILOMETRE).numerical_value_in(&METRE).unwrap(), 2500.0);
}

#[test]
fn test_integral_downscaling_needs_an_explicit_cast() {
    let d = 1999i32 * &*METRE;
    let err = d.in_unit(&KILOMETRE).unwrap_err();
    assert!(matches!(err, Error::TruncatingConversion { rep: "i32", .. }));

    let km = d.value_cast(&KILOMETRE).unwrap();
    assert_eq!(*km.numerical_value_ref(), 1);
    assert_eq!(km.to_string(), "1 km");

    assert_eq!((1500.0f64 * &*METRE).numerical_value_in(&KILOMETRE).unwrap(), 1.5);
}

#[test]
fn test_unrelated_units_are_rejected() {
    let d = 2i32 * &*METRE;
    assert!(matches!(d.in_unit(&SECOND), Err(Error::UnitNotOf { .. })));
    assert!(matches!(d.value_cast(&SECOND), Err(Error::UnitNotOf { .. })));
}

#[test]
fn test_addition_uses_the_common_unit() {
    let sum = (1i32 * &*KILOMETRE + 1i32 * &*METRE).unwrap();
    assert_eq!(*sum.numerical_value_ref(), 1001);
    assert_eq!(sum.unit(), &*METRE);
    assert_eq!(sum.to_string(), "1001 m");

    let diff = (&(1i32 * &*HOUR) - &(30i32 * &*MINUTE)).unwrap();
    assert_eq!(diff.to_string(), "30 min");
}

#[test]
fn test_addition_of_unrelated_quantities_fails() {
    let err = (1i32 * &*METRE + 1i32 * &*SECOND).unwrap_err();
    assert!(matches!(err, Error::IncompatibleQuantities { .. }));
}

#[test]
fn test_comparison_across_units() {
    assert_eq!(1000 * &*MILLISECOND, 1 * &*SECOND);
    assert!(1 * &*KILOMETRE > 999 * &*METRE);
    assert!(1.5 * &*KILOMETRE < 1501.0 * &*METRE);
    assert_ne!(1 * &*METRE, 1 * &*SECOND);
    assert_eq!((1i32 * &*METRE).partial_cmp(&(1i32 * &*SECOND)), None);
}

#[test]
fn test_multiplication_and_division_build_derived_units() {
    let area = (3i32 * &*METRE) * (4i32 * &*METRE);
    assert_eq!(area.to_string(), "12 m²");
    assert_eq!(format!("{area:#}"), "12 m^2");

    let speed = (10.0f64 * &*METRE) / (2.0f64 * &*SECOND);
    assert_eq!(speed.to_string(), "5 m/s");
    assert!(speed.quantity_spec().is_kind_of());

    let kmh = speed.in_unit(&(&*KILOMETRE / &*HOUR)).unwrap();
    assert_eq!(*kmh.numerical_value_ref(), 18.0);
    assert_eq!(kmh.to_string(), "18 km/h");
}

#[test]
fn test_scalar_multiplication_keeps_the_reference() {
    let d = (2i32 * &*METRE) * 3;
    assert_eq!(d.to_string(), "6 m");
    let d = (6.0f64 * &*METRE) / 4.0;
    assert_eq!(d.to_string(), "1.5 m");
    let d = -(2i32 * &*METRE);
    assert_eq!(*d.numerical_value_ref(), -2);
}

#[test]
fn test_named_derived_units() {
    let f = 50i32 * &*HERTZ;
    assert_eq!(f.to_string(), "50 Hz");
    assert_eq!(f.quantity_spec(), &FREQUENCY.kind_of());

    let per_second = Quantity::new(1, Reference::from(SECOND.invert())).unwrap();
    let sum = (f.clone() + per_second).unwrap();
    assert_eq!(*sum.numerical_value_ref(), 51);
    assert_eq!(sum.unit(), &*HERTZ);
    assert_eq!(sum.quantity_spec(), &FREQUENCY.kind_of());

    let err = (f + 1 * &*BECQUEREL).unwrap_err();
    assert!(matches!(err, Error::IncompatibleQuantities { .. }));
}

#[test]
fn test_typed_references_follow_the_hierarchy() {
    let length_m = LENGTH.with_unit(&METRE).unwrap();
    let width_m = WIDTH.with_unit(&METRE).unwrap();
    let height_m = HEIGHT.with_unit(&METRE).unwrap();

    let w = Quantity::new(2.0, &width_m).unwrap();
    let l = w.convert::<f64>(&length_m).unwrap();
    assert_eq!(l.quantity_spec(), &*LENGTH);

    let err = l.convert::<f64>(&width_m).unwrap_err();
    assert!(matches!(err, Error::NotImplicitlyConvertible { .. }));
    let back = l.value_cast_into::<f64>(&width_m).unwrap();
    assert_eq!(back.quantity_spec(), &*WIDTH);

    assert!(w.value_cast_into::<f64>(&height_m).is_err());
    let h = w.quantity_cast(&HEIGHT).unwrap();
    assert_eq!(h.quantity_spec(), &*HEIGHT);
    assert_eq!(*h.numerical_value_ref(), 2.0);
    assert!(matches!(
        w.quantity_cast(&TIME),
        Err(Error::IncompatibleQuantities { .. })
    ));
}

#[test]
fn test_sum_of_siblings_is_their_common_ancestor() {
    let w = Quantity::new(2, WIDTH.with_unit(&METRE).unwrap()).unwrap();
    let h = Quantity::new(30, HEIGHT.with_unit(&CENTIMETRE).unwrap()).unwrap();
    let sum = (w + h).unwrap();
    assert_eq!(sum.quantity_spec(), &*LENGTH);
    assert_eq!(sum.unit(), &*CENTIMETRE);
    assert_eq!(*sum.numerical_value_ref(), 230);
}

#[test]
fn test_energy_and_torque_only_meet_through_a_cast() {
    assert_eq!(ENERGY.convertible(&TORQUE), SpecConvertibility::Cast);
    let newton_metre = &*NEWTON * &*METRE;

    let e = 1.0f64 * &*JOULE;
    assert!(TORQUE.with_unit(&JOULE).is_err());
    let t = Quantity::new(1.0, TORQUE.with_unit(&newton_metre).unwrap()).unwrap();
    assert!((e + t).is_err());

    let e = Quantity::new(1.0, ENERGY.with_unit(&newton_metre).unwrap()).unwrap();
    let t = e.quantity_cast(&TORQUE).unwrap();
    assert_eq!(t.quantity_spec(), &*TORQUE);
}

#[test]
fn test_representation_changes() {
    let d = 2i32 * &*METRE;
    let f = d.convert::<f64>(d.reference()).unwrap();
    assert_eq!(*f.numerical_value_ref(), 2.0);

    let widened = (3i32 * &*KILOMETRE)
        .convert::<i64>(&Reference::from(&*METRE))
        .unwrap();
    assert_eq!(*widened.numerical_value_ref(), 3000i64);

    let truncated = (2.7f64 * &*METRE).value_cast_rep::<i32>().unwrap();
    assert_eq!(*truncated.numerical_value_ref(), 2);

    let km = (1999.9f64 * &*METRE).value_cast_to::<i32>(&KILOMETRE).unwrap();
    assert_eq!(*km.numerical_value_ref(), 1);
    let mm = (1.25f64 * &*METRE).value_cast_to::<i64>(&MILLIMETRE).unwrap();
    assert_eq!(*mm.numerical_value_ref(), 1250);
}

#[test]
fn test_implicit_floating_narrowing_keeps_range() {
    let m = Reference::from(&*METRE);
    let d = 1.5f64 * &*KILOMETRE;
    let narrowed = d.convert::<f32>(&m).unwrap();
    assert_eq!(*narrowed.numerical_value_ref(), 1500.0f32);

    let huge = 1e300f64 * &*METRE;
    assert!(matches!(
        huge.convert::<f32>(&m),
        Err(Error::ValueOutOfRange { rep: "f32", .. })
    ));

    let big = 3_000_000_000i64 * &*METRE;
    assert_eq!(*big.convert::<f64>(&m).unwrap().numerical_value_ref(), 3e9);
    assert_eq!(*(7i32 * &*METRE).convert::<f32>(&m).unwrap().numerical_value_ref(), 7.0f32);
}

#[test]
fn test_force_in_saturates_instead_of_rejecting() {
    let d = 1i8 * &*KILOMETRE;
    assert!(matches!(
        d.value_cast(&MILLIMETRE),
        Err(Error::ScalingOverflow { rep: "i8", .. })
    ));
    let forced = d.force_in(&MILLIMETRE).unwrap();
    assert_eq!(*forced.numerical_value_ref(), i8::MAX);
}

#[test]
fn test_vector_quantities() {
    let metre_per_second = &*METRE / &*SECOND;
    let velocity = VELOCITY.with_unit(&metre_per_second).unwrap();

    let v = Vector([3.0f64, 4.0, 0.0]) * &velocity;
    assert_eq!(v.to_string(), "[3, 4, 0] m/s");
    assert_eq!(v.numerical_value_ref().norm(), 5.0);

    let kmh = v.in_unit(&(&*KILOMETRE / &*HOUR)).unwrap();
    assert_eq!(*kmh.numerical_value_ref(), Vector([10.8, 14.4, 0.0]));

    let doubled = (v.clone() * 2.0).try_add(&v).unwrap();
    assert_eq!(*doubled.numerical_value_ref(), Vector([9.0, 12.0, 0.0]));

    let err = Quantity::new(1.0, &velocity).unwrap_err();
    assert!(matches!(
        err,
        Error::CharacterMismatch {
            rep: "f64",
            character: "vector",
            ..
        }
    ));
}

#[test]
#[should_panic(expected = "cannot represent vector quantity")]
fn test_scalar_value_times_vector_reference_panics() {
    let velocity = VELOCITY.with_unit(&(&*METRE / &*SECOND)).unwrap();
    let _ = 1.0 * &velocity;
}

#[test]
fn test_ascii_rendering() {
    let t = 20.0f64 * &*DEGREE_CELSIUS;
    assert_eq!(t.to_string(), "20 ℃");
    assert_eq!(format!("{t:#}"), "20 deg_C");
    assert_eq!(format!("{:.2}", 1.5 * &*METRE), "1.50 m");
}

#[test]
fn test_scaled_units() {
    let half_metre = mag(1) / mag(2) * &*METRE;
    let d = 3.0f64 * &half_metre;
    assert_eq!(d.numerical_value_in(&METRE).unwrap(), 1.5);
    assert_eq!(d.to_string(), "3 [1/2 m]");
}

#[test]
fn test_zero_and_dimensionless_quantities() {
    let zero = Quantity::<i32>::zero(&*SECOND).unwrap();
    assert_eq!(zero, 0 * &*MILLISECOND);

    let ratio = (6i32 * &*METRE) / (3i32 * &*METRE);
    assert!(ratio.unit().is_one());
    assert_eq!(ratio.to_string(), "2");
}
