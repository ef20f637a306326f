//! Radiation impedance of a rigid circular piston.

use num_complex::Complex64;
use std::f64::consts::PI;

use crate::constants::Medium;
use crate::special::{bessel_j1, struve_h1};

/// ka below which the J₁/H₁ quotients are replaced by their analytic limits.
const KA_LIMIT_THRESHOLD: f64 = 1e-8;

/// Solid angle the radiating mouth opens into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RadiationSpace {
    /// Piston in an infinite baffle, radiating into 2π sr.
    #[default]
    HalfSpace,
    /// Unbaffled radiation into the full 4π sr.
    FullSpace,
}

impl RadiationSpace {
    /// Scale applied to the baffled-piston impedance for this baseline.
    pub fn impedance_scale(&self) -> f64 {
        match self {
            RadiationSpace::HalfSpace => 1.0,
            RadiationSpace::FullSpace => 0.5,
        }
    }

    /// Solid angle in steradians, used when spreading radiated power.
    pub fn solid_angle(&self) -> f64 {
        match self {
            RadiationSpace::HalfSpace => 2.0 * PI,
            RadiationSpace::FullSpace => 4.0 * PI,
        }
    }
}

/// Dimensionless frequency ka = 2πf·√(S/π)/c for a piston of area `area`.
pub fn ka(area: f64, frequency: f64, medium: &Medium) -> f64 {
    let radius = (area / PI).sqrt();
    2.0 * PI * frequency * radius / medium.speed_of_sound
}

/// Normalized radiation impedance R(ka) + jX(ka) of a rigid circular piston
/// in an infinite baffle:
///
///   R(ka) = 1 − J₁(2ka)/ka,  X(ka) = H₁(2ka)/ka
///
/// Below [`KA_LIMIT_THRESHOLD`] the quotients are replaced by the analytic
/// limits R → (ka)²/2, X → 8ka/(3π).
pub fn normalized(ka: f64) -> Complex64 {
    debug_assert!(ka >= 0.0, "ka must be non-negative, got {ka}");
    if ka < KA_LIMIT_THRESHOLD {
        return Complex64::new(0.5 * ka * ka, 8.0 * ka / (3.0 * PI));
    }
    let z = 2.0 * ka;
    Complex64::new(1.0 - bessel_j1(z) / ka, struve_h1(z) / ka)
}

/// Absolute radiation impedance (ρc/S)·scale·Z_norm in Pa·s/m³.
///
/// Non-positive `area` or `frequency` is a caller error; the constructors
/// upstream validate both before a sweep starts.
pub fn piston(area: f64, frequency: f64, medium: &Medium, space: RadiationSpace) -> Complex64 {
    debug_assert!(area > 0.0, "piston area must be positive, got {area}");
    debug_assert!(frequency > 0.0, "frequency must be positive, got {frequency}");
    let z_norm = normalized(ka(area, frequency, medium));
    z_norm * medium.characteristic_impedance(area) * space.impedance_scale()
}
