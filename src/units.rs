//! units.rs — compile-time-checked physical quantities
//!
//! The original implementation leaned on a dynamic units package (pint):
//! every quantity carried its dimension at runtime and arithmetic between
//! incompatible dimensions raised at call time. Here each dimension gets its
//! own newtype so the compiler rejects the mismatch instead.
//!
//! Only the dimensions spec.md §3 names are represented: seconds, meters,
//! meters/second, hertz, radians, degrees, watts, decibels.

use std::fmt;
use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub};

macro_rules! scalar_quantity {
    ($name:ident, $unit:expr) => {
        #[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
        pub struct $name(pub f64);

        impl $name {
            pub fn new(value: f64) -> Self {
                Self(value)
            }

            pub fn get(self) -> f64 {
                self.0
            }
        }

        impl Add for $name {
            type Output = $name;
            fn add(self, rhs: $name) -> $name {
                $name(self.0 + rhs.0)
            }
        }

        impl AddAssign for $name {
            fn add_assign(&mut self, rhs: $name) {
                self.0 += rhs.0;
            }
        }

        impl Sub for $name {
            type Output = $name;
            fn sub(self, rhs: $name) -> $name {
                $name(self.0 - rhs.0)
            }
        }

        impl Neg for $name {
            type Output = $name;
            fn neg(self) -> $name {
                $name(-self.0)
            }
        }

        impl Mul<f64> for $name {
            type Output = $name;
            fn mul(self, rhs: f64) -> $name {
                $name(self.0 * rhs)
            }
        }

        impl Div<f64> for $name {
            type Output = $name;
            fn div(self, rhs: f64) -> $name {
                $name(self.0 / rhs)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{} {}", self.0, $unit)
            }
        }
    };
}

scalar_quantity!(Seconds, "s");
scalar_quantity!(Meters, "m");
scalar_quantity!(MetersPerSecond, "m/s");
scalar_quantity!(Hertz, "Hz");
scalar_quantity!(Radians, "rad");
scalar_quantity!(Degrees, "deg");
scalar_quantity!(Watts, "W");

/// Decibels are logarithmic: "addition" of two dB quantities is defined as
/// multiplication of the underlying linear ratios (spec.md §3).
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct Decibels(pub f64);

impl Decibels {
    pub fn new(value: f64) -> Self {
        Self(value)
    }

    pub fn get(self) -> f64 {
        self.0
    }

    pub fn to_linear(self) -> f64 {
        10f64.powf(self.0 / 10.0)
    }

    pub fn from_linear(linear: f64) -> Self {
        Self(10.0 * linear.log10())
    }
}

/// Linear-domain addition: combine two dB quantities by multiplying their
/// linear power ratios and converting back, per spec.md §3.
impl Add for Decibels {
    type Output = Decibels;
    fn add(self, rhs: Decibels) -> Decibels {
        Decibels::from_linear(self.to_linear() * rhs.to_linear())
    }
}

/// Arithmetic bias applied directly in the dB domain (e.g. a systematic
/// measurement offset) is still an ordinary sum of magnitudes; callers that
/// mean "add this many dB of offset" should use `offset_db`, not `Add`.
impl Decibels {
    pub fn offset_db(self, offset: f64) -> Decibels {
        Decibels(self.0 + offset)
    }
}

impl fmt::Display for Decibels {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} dB", self.0)
    }
}

impl Degrees {
    pub fn to_radians(self) -> Radians {
        Radians(self.0.to_radians())
    }
}

impl Radians {
    pub fn to_degrees(self) -> Degrees {
        Degrees(self.0.to_degrees())
    }

    /// Wrap an angle to the (-pi, pi] range, used by the antenna lobe model.
    pub fn wrap(self) -> Radians {
        let tau = std::f64::consts::TAU;
        let mut a = self.0 % tau;
        if a <= -std::f64::consts::PI {
            a += tau;
        } else if a > std::f64::consts::PI {
            a -= tau;
        }
        Radians(a)
    }
}

pub const SPEED_OF_LIGHT: MetersPerSecond = MetersPerSecond(299_792_458.0);

/// Parses a `"<value> <unit>"` string (e.g. `"0.1 dB"`, `"5 Hz"`, `"2.5"`)
/// as the original Python `parse_value_and_unit` did, but fails closed: an
/// unrecognized unit is a configuration error rather than a silently
/// dimensionless value.
pub fn parse_value_and_unit(s: &str) -> Result<(f64, String), crate::error::SimError> {
    let s = s.trim();
    let mut parts = s.splitn(2, char::is_whitespace);
    let value_str = parts.next().unwrap_or("");
    let unit = parts.next().unwrap_or("").trim().to_string();
    let value: f64 = value_str.parse().map_err(|_| crate::error::SimError::Unit {
        message: format!("cannot parse numeric value from '{s}'"),
    })?;
    Ok((value, unit))
}
