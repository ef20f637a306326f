use std::f64::consts::PI;

/// Reference sound pressure for SPL in Pa (20 µPa).
pub const REFERENCE_PRESSURE: f64 = 20e-6;

/// Reference distance for SPL in metres.
pub const REFERENCE_DISTANCE: f64 = 1.0;

/// Acoustic properties of the propagation medium.
///
/// Passed explicitly through every evaluation rather than held as global
/// state, so simulations with different environmental conditions can run
/// side by side.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Medium {
    /// Speed of sound in m/s.
    pub speed_of_sound: f64,
    /// Density in kg/m³.
    pub density: f64,
}

impl Medium {
    pub fn new(speed_of_sound: f64, density: f64) -> Self {
        Self {
            speed_of_sound,
            density,
        }
    }

    /// Air at the given temperature in °C. Uses the ideal-gas approximation:
    /// c = 331.3·√(T/273.15), ρ = p / (R_specific · T) at 101325 Pa.
    pub fn air_at(temperature_c: f64) -> Self {
        let t_kelvin = temperature_c + 273.15;
        let speed_of_sound = 331.3 * (t_kelvin / 273.15).sqrt();
        let density = 101325.0 / (287.05 * t_kelvin);
        Self {
            speed_of_sound,
            density,
        }
    }

    /// Characteristic impedance ρc/S of a duct with cross-section `area` (m²).
    pub fn characteristic_impedance(&self, area: f64) -> f64 {
        self.density * self.speed_of_sound / area
    }

    /// Wavenumber k = ω/c (rad/m).
    pub fn wavenumber(&self, omega: f64) -> f64 {
        omega / self.speed_of_sound
    }

    /// ρc², the adiabatic bulk modulus of the medium (Pa).
    pub fn bulk_modulus(&self) -> f64 {
        self.density * self.speed_of_sound * self.speed_of_sound
    }
}

impl Default for Medium {
    /// Air at 20 °C.
    fn default() -> Self {
        Self::air_at(20.0)
    }
}

/// Cross-sectional area from diameter (both in metres).
pub fn area_from_diameter(diameter: f64) -> f64 {
    PI * (diameter / 2.0).powi(2)
}
