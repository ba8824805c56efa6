#![allow(dead_code)]

use ferrum_units::{
    absolute_point_origin, base_dimension, mag, mag_ratio, named_unit, prefix, quantity_spec,
    relative_point_origin, Magnitude,
};

prefix!(pub KILO = "k", mag(1000));
prefix!(pub CENTI = "c", mag_ratio(1, 100));
prefix!(pub MILLI = "m", mag_ratio(1, 1000));

base_dimension!(pub DIM_LENGTH = "L");
base_dimension!(pub DIM_MASS = "M");
base_dimension!(pub DIM_TIME = "T");
base_dimension!(pub DIM_TEMPERATURE = ("Θ", "O"));

quantity_spec!(pub LENGTH = base("length", DIM_LENGTH));
quantity_spec!(pub WIDTH = child("width", LENGTH));
quantity_spec!(pub HEIGHT = child("height", LENGTH));
quantity_spec!(pub RADIUS = child("radius", WIDTH));
quantity_spec!(pub DISPLACEMENT = child("displacement", LENGTH).vector());
quantity_spec!(pub MASS = base("mass", DIM_MASS));
quantity_spec!(pub TIME = base("time", DIM_TIME));
quantity_spec!(pub THERMODYNAMIC_TEMPERATURE = base("thermodynamic temperature", DIM_TEMPERATURE));

quantity_spec!(pub AREA = derived("area", LENGTH.pow(2, 1)));
quantity_spec!(pub SPEED = derived("speed", &*LENGTH / &*TIME));
quantity_spec!(pub VELOCITY = child("velocity", SPEED).equation(&*DISPLACEMENT / &*TIME).vector());
quantity_spec!(pub ACCELERATION = derived("acceleration", &*SPEED / &*TIME));
quantity_spec!(pub FORCE = derived("force", &*MASS * &*ACCELERATION));
quantity_spec!(pub ENERGY = derived("energy", &*FORCE * &*LENGTH));
quantity_spec!(pub TORQUE = derived("torque", &*FORCE * &*LENGTH));
quantity_spec!(pub FREQUENCY = derived("frequency", TIME.invert()));
quantity_spec!(pub ACTIVITY = derived("activity", TIME.invert()));

named_unit!(pub METRE = "m", base(LENGTH));
named_unit!(pub KILOGRAM = "kg", base(MASS));
named_unit!(pub SECOND = "s", base(TIME));
named_unit!(pub KELVIN = "K", base(THERMODYNAMIC_TEMPERATURE), point_origin(ABSOLUTE_ZERO));

named_unit!(pub KILOMETRE = prefixed(KILO, METRE));
named_unit!(pub CENTIMETRE = prefixed(CENTI, METRE));
named_unit!(pub MILLIMETRE = prefixed(MILLI, METRE));
named_unit!(pub MILLISECOND = prefixed(MILLI, SECOND));
named_unit!(pub MILLIKELVIN = prefixed(MILLI, KELVIN));

named_unit!(pub MINUTE = "min", defined_as(mag(60) * &*SECOND));
named_unit!(pub HOUR = "h", defined_as(mag(60) * &*MINUTE));
named_unit!(pub HERTZ = "Hz", defined_as(SECOND.invert()), kind(FREQUENCY));
named_unit!(pub BECQUEREL = "Bq", defined_as(SECOND.invert()), kind(ACTIVITY));
named_unit!(pub NEWTON = "N", defined_as(&*KILOGRAM * &*METRE / SECOND.pow(2, 1)), kind(FORCE));
named_unit!(pub JOULE = "J", defined_as(&*NEWTON * &*METRE), kind(ENERGY));
named_unit!(pub RADIAN = "rad", defined_as(&*METRE / &*METRE));
named_unit!(pub DEGREE = ("°", "deg"), defined_as(Magnitude::pi().divide(&mag(180)) * &*RADIAN));
named_unit!(
    pub DEGREE_CELSIUS = ("℃", "deg_C"),
    defined_as(KELVIN),
    point_origin(ICE_POINT)
);

absolute_point_origin!(pub ABSOLUTE_ZERO = "absolute_zero", THERMODYNAMIC_TEMPERATURE);
relative_point_origin!(pub ICE_POINT = "ice_point", ABSOLUTE_ZERO, 273_150 * &*MILLIKELVIN);
absolute_point_origin!(pub EPOCH = "epoch", TIME);

/// High-energy-physics system of quantities: energy is a base quantity and
/// mass derives from it.
pub mod hep {
    use ferrum_units::{
        base_dimension, mag, mag_ratio, named_unit, prefix, quantity_spec, Magnitude,
    };

    prefix!(pub NANO = "n", mag_ratio(1, 1_000_000_000));
    prefix!(pub MILLI = "m", mag_ratio(1, 1000));
    prefix!(pub CENTI = "c", mag_ratio(1, 100));
    prefix!(pub MEGA = "M", mag(1_000_000));
    prefix!(pub GIGA = "G", mag(1_000_000_000));

    base_dimension!(pub DIM_LENGTH = "L");
    base_dimension!(pub DIM_ANGLE = ("α", "a"));
    base_dimension!(pub DIM_TIME = "T");
    base_dimension!(pub DIM_ELECTRIC_CHARGE = "Q");
    base_dimension!(pub DIM_ENERGY = "E");
    base_dimension!(pub DIM_TEMPERATURE = ("Θ", "O"));
    base_dimension!(pub DIM_AMOUNT_OF_SUBSTANCE = "N");
    base_dimension!(pub DIM_LUMINOUS_INTENSITY = "I");

    quantity_spec!(pub LENGTH = base("length", DIM_LENGTH));
    quantity_spec!(pub ANGLE = base("angle", DIM_ANGLE));
    quantity_spec!(pub SOLID_ANGLE = derived("solid_angle", ANGLE.pow(2, 1)));
    quantity_spec!(pub DURATION = base("duration", DIM_TIME));
    quantity_spec!(pub ELECTRIC_CHARGE = base("electric_charge", DIM_ELECTRIC_CHARGE));
    quantity_spec!(pub ENERGY = base("energy", DIM_ENERGY));
    quantity_spec!(pub TEMPERATURE = base("temperature", DIM_TEMPERATURE));
    quantity_spec!(pub AMOUNT_OF_SUBSTANCE = base("amount_of_substance", DIM_AMOUNT_OF_SUBSTANCE));
    quantity_spec!(pub LUMINOUS_INTENSITY = base("luminous_intensity", DIM_LUMINOUS_INTENSITY));

    quantity_spec!(pub AREA = derived("area", LENGTH.pow(2, 1)));
    quantity_spec!(pub VOLUME = derived("volume", LENGTH.pow(3, 1)));

    quantity_spec!(pub ELECTRIC_CURRENT = derived("electric_current", &*ELECTRIC_CHARGE / &*DURATION));
    quantity_spec!(pub ELECTRIC_POTENTIAL = derived("electric_potential", &*ENERGY / &*ELECTRIC_CHARGE));
    quantity_spec!(pub ELECTRIC_RESISTANCE = derived(
        "electric_resistance",
        &*ENERGY * &*DURATION / ELECTRIC_CHARGE.pow(2, 1)
    ));
    quantity_spec!(pub ELECTRIC_CAPACITANCE = derived(
        "electric_capacitance",
        ELECTRIC_CHARGE.pow(2, 1) / (*ENERGY).clone()
    ));

    quantity_spec!(pub MAGNETIC_FLUX = derived(
        "magnetic_flux",
        &*DURATION * &*ENERGY / (*ELECTRIC_CHARGE).clone()
    ));
    quantity_spec!(pub MAGNETIC_FIELD = derived(
        "magnetic_field",
        &*DURATION * &*ENERGY / (*ELECTRIC_CHARGE).clone() / LENGTH.pow(2, 1)
    ));
    quantity_spec!(pub INDUCTANCE = derived(
        "inductance",
        DURATION.pow(2, 1) * (*ENERGY).clone() / ELECTRIC_CHARGE.pow(2, 1)
    ));

    quantity_spec!(pub POWER = derived("power", &*ENERGY / &*DURATION));
    quantity_spec!(pub FORCE = derived("force", &*ENERGY / &*LENGTH));
    quantity_spec!(pub PRESSURE = derived("pressure", &*ENERGY / &LENGTH.pow(3, 1)));

    quantity_spec!(pub MASS = derived(
        "mass",
        &*ENERGY * &DURATION.pow(2, 1) / LENGTH.pow(2, 1)
    ));
    quantity_spec!(pub FREQUENCY = derived("frequency", DURATION.invert()));

    quantity_spec!(pub ACTIVITY = derived("activity", DURATION.invert()));
    quantity_spec!(pub ABSORBED_DOSE = derived(
        "absorbed_dose",
        LENGTH.pow(2, 1) / DURATION.pow(2, 1)
    ));

    quantity_spec!(pub LUMINOUS_FLUX = derived("luminous_flux", &*LUMINOUS_INTENSITY * &*SOLID_ANGLE));
    quantity_spec!(pub ILLUMINANCE = derived("illuminance", &*LUMINOUS_FLUX / &LENGTH.pow(2, 1)));

    named_unit!(pub METRE = "m", base(LENGTH));
    named_unit!(pub RADIAN = "rad", base(ANGLE));
    named_unit!(pub SECOND = "s", base(DURATION));
    named_unit!(pub EPLUS = ("e⁺", "e+"), base(ELECTRIC_CHARGE));
    named_unit!(pub ELECTRONVOLT = "eV", base(ENERGY));
    named_unit!(pub KELVIN = "K", base(TEMPERATURE));
    named_unit!(pub MOLE = "mol", base(AMOUNT_OF_SUBSTANCE));
    named_unit!(pub CANDELA = "cd", base(LUMINOUS_INTENSITY));

    named_unit!(pub NANOSECOND = prefixed(NANO, SECOND));
    named_unit!(pub MILLIMETRE = prefixed(MILLI, METRE));
    named_unit!(pub CENTIMETRE = prefixed(CENTI, METRE));
    named_unit!(pub MEGAELECTRONVOLT = prefixed(MEGA, ELECTRONVOLT));
    named_unit!(pub GIGAELECTRONVOLT = prefixed(GIGA, ELECTRONVOLT));

    named_unit!(pub DEGREE = ("°", "deg"), defined_as(Magnitude::pi().divide(&mag(180)) * &*RADIAN));
    named_unit!(pub STERADIAN = "sr", defined_as(RADIAN.pow(2, 1)), kind(SOLID_ANGLE));

    named_unit!(
        pub COULOMB = "C",
        defined_as(Magnitude::constant("C/e", 6.241_509_074_460_763e18) * &*EPLUS)
    );
    named_unit!(pub VOLT = "V", defined_as(&*ELECTRONVOLT / &*EPLUS), kind(ELECTRIC_POTENTIAL));
    named_unit!(pub JOULE = "J", defined_as(&*VOLT * &*COULOMB), kind(ENERGY));
    named_unit!(pub AMPERE = "A", defined_as(&*COULOMB / &*SECOND), kind(ELECTRIC_CURRENT));
    named_unit!(pub OHM = ("Ω", "ohm"), defined_as(&*VOLT / &*AMPERE), kind(ELECTRIC_RESISTANCE));
    named_unit!(pub FARAD = "F", defined_as(&*COULOMB / &*VOLT), kind(ELECTRIC_CAPACITANCE));
    named_unit!(pub WEBER = "Wb", defined_as(&*VOLT * &*SECOND), kind(MAGNETIC_FLUX));
    named_unit!(pub TESLA = "T", defined_as(&*WEBER / &METRE.pow(2, 1)), kind(MAGNETIC_FIELD));
    named_unit!(pub HENRY = "H", defined_as(&*WEBER / &*AMPERE), kind(INDUCTANCE));
    named_unit!(pub WATT = "W", defined_as(&*JOULE / &*SECOND), kind(POWER));
    named_unit!(pub NEWTON = "N", defined_as(&*JOULE / &*METRE), kind(FORCE));
    named_unit!(pub PASCAL = "Pa", defined_as(&*NEWTON / &METRE.pow(2, 1)), kind(PRESSURE));
    named_unit!(
        pub GRAM = "g",
        defined_as(mag_ratio(1, 1000) * &(&*JOULE * &SECOND.pow(2, 1) / METRE.pow(2, 1))),
        kind(MASS)
    );
    named_unit!(pub HERTZ = "Hz", defined_as(SECOND.invert()), kind(FREQUENCY));
    named_unit!(pub BECQUEREL = "Bq", defined_as(SECOND.invert()), kind(ACTIVITY));
    named_unit!(pub GRAY = "Gy", defined_as(METRE.pow(2, 1) / SECOND.pow(2, 1)), kind(ABSORBED_DOSE));
    named_unit!(pub LUMEN = "lm", defined_as(&*CANDELA * &*STERADIAN), kind(LUMINOUS_FLUX));
    named_unit!(pub LUX = "lx", defined_as(&*LUMEN / &METRE.pow(2, 1)), kind(ILLUMINANCE));
}
