//! Mathematical functions on quantities.

use ferrum_units::math::{abs, cbrt, ceil, epsilon, floor, hypot, hypot3, pow, round, sqrt};
use ferrum_units::{Error, Quantity};

mod test_support;
use test_support::*;

fn area(value: i32) -> Quantity<i32> {
    Quantity::new(value, AREA.with_unit(&METRE.pow(2, 1)).unwrap()).unwrap()
}

#[test]
fn test_pow() {
    let one = pow(&(2 * &*METRE), 0, 1);
    assert_eq!(*one.numerical_value_ref(), 1);
    assert!(one.unit().is_one());

    assert_eq!(pow(&(2 * &*METRE), 1, 1), 2 * &*METRE);
    assert_eq!(pow(&(2 * &*METRE), 2, 1), area(4));

    let cube = pow(&(2 * &*METRE), 3, 1);
    assert_eq!(*cube.numerical_value_ref(), 8);
    assert_eq!(cube.to_string(), "8 m³");
}

#[test]
fn test_roots() {
    assert_eq!(sqrt(&area(4)), 2 * &*METRE);
    assert_eq!(cbrt(&(8.0 * &METRE.pow(3, 1))), 2.0 * &*METRE);

    let quarter = pow(&(16.0 * &METRE.pow(2, 1)), 1, 4);
    assert_eq!(quarter, sqrt(&(4.0 * &*METRE)));
    assert_eq!(quarter.to_string(), "2 m¹ᐟ²");
}

#[test]
fn test_abs() {
    assert_eq!(abs(&(-1 * &*METRE)), 1 * &*METRE);
    assert_eq!(abs(&(-1.0 * &*METRE)), 1.0 * &*METRE);
    assert_eq!(abs(&(1 * &*METRE)), 1 * &*METRE);
    assert_eq!(abs(&(1.0 * &*METRE)), 1.0 * &*METRE);
}

#[test]
fn test_epsilon() {
    let eps = epsilon::<f64>(&*METRE).unwrap();
    assert_eq!(*eps.numerical_value_ref(), f64::EPSILON);
    let eps = epsilon::<i32>(&*METRE).unwrap();
    assert_eq!(*eps.numerical_value_ref(), 0);
}

#[test]
fn test_floor() {
    let cases = [
        (1000, 1),
        (1001, 1),
        (1999, 1),
        (-1000, -1),
        (-999, -1),
    ];
    for (ms, s) in cases {
        let q = ms * &*MILLISECOND;
        assert_eq!(floor(&q, &SECOND).unwrap(), s * &*SECOND, "floor({ms} ms)");
        let q = f64::from(ms) * &*MILLISECOND;
        assert_eq!(floor(&q, &SECOND).unwrap(), f64::from(s) * &*SECOND, "floor({ms}. ms)");
    }
    assert_eq!(floor(&(1 * &*SECOND), &SECOND).unwrap(), 1 * &*SECOND);
    assert_eq!(floor(&(1.3 * &*SECOND), &SECOND).unwrap(), 1.0 * &*SECOND);
    assert_eq!(floor(&(-1.3 * &*SECOND), &SECOND).unwrap(), -2.0 * &*SECOND);
}

#[test]
fn test_ceil() {
    let cases = [
        (1000, 1),
        (1001, 2),
        (1999, 2),
        (-1000, -1),
        (-999, 0),
    ];
    for (ms, s) in cases {
        let q = ms * &*MILLISECOND;
        assert_eq!(ceil(&q, &SECOND).unwrap(), s * &*SECOND, "ceil({ms} ms)");
        let q = f64::from(ms) * &*MILLISECOND;
        assert_eq!(ceil(&q, &SECOND).unwrap(), f64::from(s) * &*SECOND, "ceil({ms}. ms)");
    }
    assert_eq!(ceil(&(1.3 * &*SECOND), &SECOND).unwrap(), 2.0 * &*SECOND);
    assert_eq!(ceil(&(-1.3 * &*SECOND), &SECOND).unwrap(), -1.0 * &*SECOND);
}

#[test]
fn test_round_halves_away_from_zero() {
    let cases = [
        (1000, 1),
        (1001, 1),
        (1499, 1),
        (1500, 2),
        (1999, 2),
        (-1000, -1),
        (-1001, -1),
        (-1499, -1),
        (-1500, -2),
        (-1999, -2),
    ];
    for (ms, s) in cases {
        let q = ms * &*MILLISECOND;
        assert_eq!(round(&q, &SECOND).unwrap(), s * &*SECOND, "round({ms} ms)");
        let q = f64::from(ms) * &*MILLISECOND;
        assert_eq!(round(&q, &SECOND).unwrap(), f64::from(s) * &*SECOND, "round({ms}. ms)");
    }
}

#[test]
fn test_rounding_rejects_bad_targets() {
    assert!(matches!(
        floor(&(1 * &*METRE), &SECOND),
        Err(Error::UnitNotOf { .. })
    ));
    assert!(matches!(
        round(&(1i8 * &*KILOMETRE), &MILLIMETRE),
        Err(Error::ScalingOverflow { .. })
    ));
}

#[test]
fn test_hypot() {
    assert_eq!(hypot(&(3.0 * &*KILOMETRE), &(4.0 * &*KILOMETRE)).unwrap(), 5.0 * &*KILOMETRE);
    assert_eq!(hypot(&(3.0 * &*KILOMETRE), &(4000.0 * &*METRE)).unwrap(), 5.0 * &*KILOMETRE);
    assert!(hypot(&(3.0 * &*KILOMETRE), &(4.0 * &*SECOND)).is_err());
}

#[test]
fn test_hypot3() {
    let h = hypot3(
        &(2.0 * &*KILOMETRE),
        &(3.0 * &*KILOMETRE),
        &(6.0 * &*KILOMETRE),
    )
    .unwrap();
    assert_eq!(h, 7.0 * &*KILOMETRE);
    assert_eq!(h.unit(), &*KILOMETRE);

    let h = hypot3(
        &(2.0 * &*KILOMETRE),
        &(3000.0 * &*METRE),
        &(6.0 * &*KILOMETRE),
    )
    .unwrap();
    assert_eq!(h, 7.0 * &*KILOMETRE);
    assert_eq!(h.unit(), &*METRE);
}
