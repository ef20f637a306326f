//! Thiele-Small driver model and the coupled electro-mechanical circuit
//! solve.

use num_complex::Complex64;
use std::f64::consts::PI;

use crate::constants::Medium;
use crate::error::ConfigurationError;

/// Thiele-Small parameters of one loudspeaker unit, SI units throughout.
///
/// `mmd` is the moving mass of the driver alone; radiation mass loading
/// arrives through the acoustic load reflection and is never double-counted
/// here. Immutable once constructed — a new configuration means a new
/// instance.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Driver {
    /// Diaphragm area S_d (m²).
    pub sd: f64,
    /// Voice-coil DC resistance R_e (Ω).
    pub re: f64,
    /// Voice-coil inductance L_e (H); zero for the ideal simple model.
    pub le: f64,
    /// Force factor BL (T·m).
    pub bl: f64,
    /// Mechanical moving mass M_md (kg), driver only.
    pub mmd: f64,
    /// Mechanical suspension compliance C_ms (m/N).
    pub cms: f64,
    /// Mechanical suspension resistance R_ms (N·s/m).
    pub rms: f64,
}

/// Solved state of the driver circuit at one frequency.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DriveState {
    /// Driving-point electrical impedance Z_e + BL²/(Z_m + Z_load) (Ω).
    pub electrical_impedance: Complex64,
    /// Voice-coil current (A).
    pub current: Complex64,
    /// Diaphragm velocity (m/s).
    pub velocity: Complex64,
    /// Diaphragm displacement (m).
    pub displacement: Complex64,
    /// Volume velocity v·S_d (m³/s).
    pub volume_velocity: Complex64,
}

fn require_positive(name: &'static str, value: f64) -> Result<f64, ConfigurationError> {
    if value > 0.0 && value.is_finite() {
        Ok(value)
    } else {
        Err(ConfigurationError::NonPositive { name, value })
    }
}

impl Driver {
    pub fn new(
        sd: f64,
        re: f64,
        le: f64,
        bl: f64,
        mmd: f64,
        cms: f64,
        rms: f64,
    ) -> Result<Self, ConfigurationError> {
        if le < 0.0 || !le.is_finite() {
            return Err(ConfigurationError::Negative {
                name: "le",
                value: le,
            });
        }
        Ok(Self {
            sd: require_positive("sd", sd)?,
            re: require_positive("re", re)?,
            le,
            bl: require_positive("bl", bl)?,
            mmd: require_positive("mmd", mmd)?,
            cms: require_positive("cms", cms)?,
            rms: require_positive("rms", rms)?,
        })
    }

    /// Blocked electrical impedance Z_e = R_e + jωL_e.
    pub fn electrical_impedance(&self, omega: f64) -> Complex64 {
        Complex64::new(self.re, omega * self.le)
    }

    /// Mechanical branch impedance Z_m = R_ms + jωM_md + 1/(jωC_ms).
    pub fn mechanical_impedance(&self, omega: f64) -> Complex64 {
        Complex64::new(self.rms, omega * self.mmd - 1.0 / (omega * self.cms))
    }

    /// Free resonance of the bare moving assembly, 1/(2π√(M_md·C_ms)).
    pub fn free_resonance(&self) -> f64 {
        1.0 / (2.0 * PI * (self.mmd * self.cms).sqrt())
    }

    /// Suspension-equivalent air volume V_as = ρc²·C_ms·S_d² (m³).
    pub fn vas(&self, medium: &Medium) -> f64 {
        medium.bulk_modulus() * self.cms * self.sd * self.sd
    }

    /// Solve the coupled circuit equations at angular frequency `omega` for
    /// an RMS drive voltage and the acoustic loads on the two diaphragm
    /// faces (Pa·s/m³, reflected here through S_d²):
    ///
    /// ```text
    /// V    = Z_e·i + BL·v
    /// BL·i = (Z_m + Z_load)·v
    /// ```
    ///
    /// Eliminating i gives v = V·BL / (Z_e·(Z_m + Z_load) + BL²); the
    /// denominator stays away from zero for any validated parameter set.
    pub fn solve(
        &self,
        omega: f64,
        drive_voltage: f64,
        z_acoustic_front: Complex64,
        z_acoustic_rear: Complex64,
    ) -> DriveState {
        let voltage = Complex64::new(drive_voltage, 0.0);
        let bl = Complex64::new(self.bl, 0.0);
        let sd_sq = self.sd * self.sd;

        let z_e = self.electrical_impedance(omega);
        let z_m = self.mechanical_impedance(omega);
        let z_load = (z_acoustic_front + z_acoustic_rear) * sd_sq;
        let z_motional = z_m + z_load;

        let velocity = voltage * bl / (z_e * z_motional + bl * bl);
        let electrical_impedance = z_e + bl * bl / z_motional;
        let current = voltage / electrical_impedance;
        let displacement = velocity * Complex64::new(0.0, -1.0 / omega);

        DriveState {
            electrical_impedance,
            current,
            velocity,
            displacement,
            volume_velocity: velocity * self.sd,
        }
    }
}
