//! Acoustic segment variants and their transfer matrices.
//!
//! The shape set is closed (conical, exponential, hyperbolic, lumped
//! chamber), so segments are a tagged enum dispatched by exhaustive match
//! rather than trait objects.
//!
//! All three flared variants are solutions of the Webster horn equation for
//! an area law S(x) = S₁·f(x)². Substituting p = q/f turns it into
//! q'' + γ²q = 0 with γ² = k² − f''/f, and f''/f is constant for every flare
//! in the family (zero for cones, m² for exponentials, 1/x₀² for the hypex
//! family). One evaluation path therefore serves all three, parameterized by
//! the flare function and its derivative at the two ends.

use num_complex::Complex64;
use std::f64::consts::PI;

use crate::constants::Medium;
use crate::error::ConfigurationError;
use crate::transfer_matrix::TransferMatrix;

/// Matching tolerance used when a conical segment degenerates to a uniform
/// duct.
const UNIFORM_AREA_TOLERANCE: f64 = 1e-12;

/// One acoustic segment of an enclosure, throat (driver side) to mouth.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum HornSegment {
    /// Linear-radius flare. Evaluated with the exact spherical-wave solution
    /// referenced to the virtual apex; no short-segment approximation.
    Conical {
        throat_area: f64,
        mouth_area: f64,
        length: f64,
    },
    /// Exponential flare S(x) = S₁·e^{2mx}, m = ln(S₂/S₁)/(2L).
    Exponential {
        throat_area: f64,
        mouth_area: f64,
        length: f64,
    },
    /// Hyperbolic-exponential family S(x) = S₁·(cosh(x/x₀) + T·sinh(x/x₀))².
    /// T = 0 is catenoidal, T = 1 exponential, T > 1 the sinh family.
    Hyperbolic {
        throat_area: f64,
        mouth_area: f64,
        length: f64,
        shape: f64,
    },
    /// Lumped compliance of an enclosed volume, C = V/(ρc²). Valid while the
    /// chamber dimensions stay small against the wavelength.
    Chamber { volume: f64 },
}

fn require_positive(name: &'static str, value: f64) -> Result<f64, ConfigurationError> {
    if value > 0.0 && value.is_finite() {
        Ok(value)
    } else {
        Err(ConfigurationError::NonPositive { name, value })
    }
}

impl HornSegment {
    pub fn conical(
        throat_area: f64,
        mouth_area: f64,
        length: f64,
    ) -> Result<Self, ConfigurationError> {
        Ok(Self::Conical {
            throat_area: require_positive("throat_area", throat_area)?,
            mouth_area: require_positive("mouth_area", mouth_area)?,
            length: require_positive("length", length)?,
        })
    }

    pub fn exponential(
        throat_area: f64,
        mouth_area: f64,
        length: f64,
    ) -> Result<Self, ConfigurationError> {
        Ok(Self::Exponential {
            throat_area: require_positive("throat_area", throat_area)?,
            mouth_area: require_positive("mouth_area", mouth_area)?,
            length: require_positive("length", length)?,
        })
    }

    pub fn hyperbolic(
        throat_area: f64,
        mouth_area: f64,
        length: f64,
        shape: f64,
    ) -> Result<Self, ConfigurationError> {
        let throat_area = require_positive("throat_area", throat_area)?;
        let mouth_area = require_positive("mouth_area", mouth_area)?;
        let length = require_positive("length", length)?;
        if shape < 0.0 || !shape.is_finite() {
            return Err(ConfigurationError::Negative {
                name: "shape",
                value: shape,
            });
        }
        // f(L) = cosh(L/x0) + T·sinh(L/x0) must reach sqrt(S2/S1) for some
        // real x0 > 0, which requires an expanding flare with
        // S2/S1 > max(1, 1 - T²) — see `hyperbolic_x0`.
        let r = (mouth_area / throat_area).sqrt();
        if r <= 1.0 || r * r < 1.0 - shape * shape {
            return Err(ConfigurationError::HyperbolicFlareUnreachable {
                throat: throat_area,
                mouth: mouth_area,
                shape,
            });
        }
        Ok(Self::Hyperbolic {
            throat_area,
            mouth_area,
            length,
            shape,
        })
    }

    pub fn chamber(volume: f64) -> Result<Self, ConfigurationError> {
        Ok(Self::Chamber {
            volume: require_positive("volume", volume)?,
        })
    }

    /// Throat-side area; `None` for chambers, which have no flow axis.
    pub fn throat_area(&self) -> Option<f64> {
        match *self {
            Self::Conical { throat_area, .. }
            | Self::Exponential { throat_area, .. }
            | Self::Hyperbolic { throat_area, .. } => Some(throat_area),
            Self::Chamber { .. } => None,
        }
    }

    /// Mouth-side area; `None` for chambers.
    pub fn mouth_area(&self) -> Option<f64> {
        match *self {
            Self::Conical { mouth_area, .. }
            | Self::Exponential { mouth_area, .. }
            | Self::Hyperbolic { mouth_area, .. } => Some(mouth_area),
            Self::Chamber { .. } => None,
        }
    }

    pub fn is_chamber(&self) -> bool {
        matches!(self, Self::Chamber { .. })
    }

    /// Cutoff frequency of the flare, if it has one: f_c = c·m/(2π) for an
    /// exponential flare, c/(2π·x₀) for the hypex family. Cones and chambers
    /// propagate down to DC.
    pub fn cutoff_frequency(&self, speed_of_sound: f64) -> Option<f64> {
        match *self {
            Self::Conical { .. } | Self::Chamber { .. } => None,
            Self::Exponential {
                throat_area,
                mouth_area,
                length,
            } => {
                let m = flare_constant(throat_area, mouth_area, length);
                if m.abs() < f64::EPSILON {
                    None
                } else {
                    Some(speed_of_sound * m.abs() / (2.0 * PI))
                }
            }
            Self::Hyperbolic {
                throat_area,
                mouth_area,
                length,
                shape,
            } => {
                let x0 = hyperbolic_x0(throat_area, mouth_area, length, shape);
                Some(speed_of_sound / (2.0 * PI * x0))
            }
        }
    }

    /// 2×2 transfer matrix of this segment at angular frequency `omega`.
    pub fn transfer_matrix(&self, omega: f64, medium: &Medium) -> TransferMatrix {
        let k = medium.wavenumber(omega);
        match *self {
            Self::Chamber { volume } => {
                let compliance = volume / medium.bulk_modulus();
                TransferMatrix::shunt_admittance(Complex64::new(0.0, omega * compliance))
            }
            Self::Conical {
                throat_area,
                mouth_area,
                length,
            } => {
                let ratio = (mouth_area / throat_area).sqrt();
                let gamma = Complex64::new(k, 0.0);
                if (ratio - 1.0).abs() < UNIFORM_AREA_TOLERANCE {
                    // Uniform duct: flare function is constant.
                    flare_matrix(throat_area, 1.0, 0.0, 0.0, gamma, length, omega, medium)
                } else {
                    // f(x) = 1 + x/x_t, x_t the throat's distance from the
                    // virtual apex (negative for a contracting cone).
                    let apex_distance = length / (ratio - 1.0);
                    let slope = 1.0 / apex_distance;
                    flare_matrix(throat_area, ratio, slope, slope, gamma, length, omega, medium)
                }
            }
            Self::Exponential {
                throat_area,
                mouth_area,
                length,
            } => {
                let m = flare_constant(throat_area, mouth_area, length);
                let gamma = propagation_constant(k, m.abs());
                let f_mouth = (m * length).exp();
                flare_matrix(
                    throat_area,
                    f_mouth,
                    m,
                    m * f_mouth,
                    gamma,
                    length,
                    omega,
                    medium,
                )
            }
            Self::Hyperbolic {
                throat_area,
                mouth_area,
                length,
                shape,
            } => {
                let x0 = hyperbolic_x0(throat_area, mouth_area, length, shape);
                let u = length / x0;
                let f_mouth = u.cosh() + shape * u.sinh();
                let df_throat = shape / x0;
                let df_mouth = (u.sinh() + shape * u.cosh()) / x0;
                let gamma = propagation_constant(k, 1.0 / x0);
                flare_matrix(
                    throat_area,
                    f_mouth,
                    df_throat,
                    df_mouth,
                    gamma,
                    length,
                    omega,
                    medium,
                )
            }
        }
    }
}

/// Exponential flare constant m = ln(S₂/S₁)/(2L).
fn flare_constant(throat_area: f64, mouth_area: f64, length: f64) -> f64 {
    (mouth_area / throat_area).ln() / (2.0 * length)
}

/// Reference length x₀ of a hypex flare, recovered in closed form from the
/// end areas, length, and shape parameter T.
///
/// With r = √(S₂/S₁) and y = e^{L/x₀}, the flare condition
/// cosh(L/x₀) + T·sinh(L/x₀) = r becomes (1+T)y² − 2ry + (1−T) = 0, whose
/// expanding root is y = (r + √(r² − (1 − T²)))/(1 + T).
fn hyperbolic_x0(throat_area: f64, mouth_area: f64, length: f64, shape: f64) -> f64 {
    let r = (mouth_area / throat_area).sqrt();
    let y = (r + (r * r - (1.0 - shape * shape)).sqrt()) / (1.0 + shape);
    length / y.ln()
}

/// Propagation constant γ of a flared segment, γ² = k² − k_c².
///
/// Above cutoff (k > k_c) γ is real and positive: travelling waves. Below
/// cutoff the passive branch is chosen, γ = −j·√(k_c² − k²), so the forward
/// wave e^{−jγx} decays away from the throat instead of growing.
///
/// The matrix evaluation itself only uses even functions of γ, so it is
/// finite at cutoff and insensitive to the branch; the branch convention
/// matters wherever the wave field is decomposed into travelling components.
pub fn propagation_constant(k: f64, k_cutoff: f64) -> Complex64 {
    let d = k * k - k_cutoff * k_cutoff;
    if d >= 0.0 {
        Complex64::new(d.sqrt(), 0.0)
    } else {
        Complex64::new(0.0, -(-d).sqrt())
    }
}

/// sin(z)/z for complex z, continuous through z = 0.
fn csinc(z: Complex64) -> Complex64 {
    if z.norm() < 1e-6 {
        let z2 = z * z;
        Complex64::new(1.0, 0.0) - z2 / 6.0 + z2 * z2 / 120.0
    } else {
        z.sin() / z
    }
}

/// Transfer matrix of a Webster flare f(x) over [0, L], built from the basis
/// {cos γx, sin(γx)/γ} of q'' + γ²q = 0 with p = q/f and
/// U = −S₁(q'f − qf')/(jωρ).
///
/// The state matrix M(x) maps basis coefficients to (p, U); the segment
/// matrix is M(0)·M(L)⁻¹. det M(x) = −S₁/(jωρ) independent of x, which keeps
/// the inversion exact and makes det T = 1 hold to rounding error.
#[allow(clippy::too_many_arguments)]
fn flare_matrix(
    throat_area: f64,
    f_mouth: f64,
    df_throat: f64,
    df_mouth: f64,
    gamma: Complex64,
    length: f64,
    omega: f64,
    medium: &Medium,
) -> TransferMatrix {
    let j_omega_rho = Complex64::new(0.0, omega * medium.density);
    let scale = Complex64::new(throat_area, 0.0) / j_omega_rho; // S₁/(jωρ)

    let gl = gamma * length;
    let qc = gl.cos(); // q₁(L)
    let qs = csinc(gl) * length; // q₂(L) = sin(γL)/γ
    let dq1 = -gamma * gamma * qs; // q₁'(L)
    let dq2 = qc; // q₂'(L)

    let fl = Complex64::new(f_mouth, 0.0);
    let dfl = Complex64::new(df_mouth, 0.0);
    let df0 = Complex64::new(df_throat, 0.0);

    // M(L) entries; M(0) reduces to [[1, 0], [scale·f'(0), −scale]].
    let ml11 = qc / fl;
    let ml12 = qs / fl;
    let ml21 = -scale * (dq1 * fl - qc * dfl);
    let ml22 = -scale * (dq2 * fl - qs * dfl);

    // T = M(0) · adj(M(L)) / det, with det = −scale exactly.
    let det = -scale;
    let a = ml22 / det;
    let b = -ml12 / det;
    let c = (scale * df0 * ml22 - (-scale) * ml21) / det;
    let d = (-(scale * df0) * ml12 + (-scale) * ml11) / det;
    TransferMatrix::new(a, b, c, d)
}
