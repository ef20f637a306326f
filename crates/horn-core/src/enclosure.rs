//! Enclosure configuration: an ordered chain of segments from the driver
//! throat to the radiating mouth, with optional front and rear chambers.

use num_complex::Complex64;

use crate::constants::Medium;
use crate::error::ConfigurationError;
use crate::segments::HornSegment;
use crate::transfer_matrix::TransferMatrix;

/// Relative tolerance for area matching between adjacent flared segments.
const CONTINUITY_TOLERANCE: f64 = 1e-6;

/// Compliance volume between the diaphragm and the horn throat.
///
/// The passage area is recorded with the geometry; the transfer matrix is the
/// lumped compliance of the volume, which holds while the chamber dimensions
/// stay small against the wavelength.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FrontChamber {
    pub volume: f64,
    pub area: f64,
}

impl FrontChamber {
    pub fn new(volume: f64, area: f64) -> Result<Self, ConfigurationError> {
        if !(volume > 0.0 && volume.is_finite()) {
            return Err(ConfigurationError::NonPositive {
                name: "front_chamber_volume",
                value: volume,
            });
        }
        if !(area > 0.0 && area.is_finite()) {
            return Err(ConfigurationError::NonPositive {
                name: "front_chamber_area",
                value: area,
            });
        }
        Ok(Self { volume, area })
    }

    /// Shunt-compliance transfer matrix, C = V/(ρc²).
    pub fn transfer_matrix(&self, omega: f64, medium: &Medium) -> TransferMatrix {
        let compliance = self.volume / medium.bulk_modulus();
        TransferMatrix::shunt_admittance(Complex64::new(0.0, omega * compliance))
    }
}

/// Sealed volume behind the diaphragm.
///
/// With a zero path length the chamber is a pure compliance. A positive path
/// length treats the volume as a closed transmission line of that length
/// (cross-section V/L), which reduces to the lumped form as kL → 0 and keeps
/// the depth resonances of long chambers.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RearChamber {
    pub volume: f64,
    pub path_length: f64,
}

impl RearChamber {
    pub fn new(volume: f64, path_length: f64) -> Result<Self, ConfigurationError> {
        if !(volume > 0.0 && volume.is_finite()) {
            return Err(ConfigurationError::NonPositive {
                name: "rear_chamber_volume",
                value: volume,
            });
        }
        if path_length < 0.0 || !path_length.is_finite() {
            return Err(ConfigurationError::Negative {
                name: "rear_chamber_path_length",
                value: path_length,
            });
        }
        Ok(Self {
            volume,
            path_length,
        })
    }

    /// Acoustic impedance loading the rear of the diaphragm.
    pub fn impedance(&self, omega: f64, medium: &Medium) -> Complex64 {
        if self.path_length > 0.0 {
            // Closed line: Z = −j·(ρc/S)·cot(kL), S = V/L.
            let area = self.volume / self.path_length;
            let kl = medium.wavenumber(omega) * self.path_length;
            let z0 = medium.characteristic_impedance(area);
            Complex64::new(0.0, -z0 * kl.cos() / kl.sin())
        } else {
            // Lumped compliance: Z = ρc²/(jωV).
            Complex64::new(0.0, -medium.bulk_modulus() / (omega * self.volume))
        }
    }
}

/// An ordered chain of acoustic segments from throat to mouth, plus optional
/// chambers at the driver-facing end.
///
/// An empty chain is the direct-radiator case: the diaphragm faces the mouth
/// termination itself.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Enclosure {
    segments: Vec<HornSegment>,
    front_chamber: Option<FrontChamber>,
    rear_chamber: Option<RearChamber>,
}

impl Enclosure {
    /// Validate and build an enclosure from segments ordered throat → mouth.
    ///
    /// Directly adjacent flared segments must have matching facing areas.
    /// A chamber acts as a plenum: it carries no flow axis of its own and
    /// lifts the continuity requirement across it.
    pub fn new(segments: Vec<HornSegment>) -> Result<Self, ConfigurationError> {
        for (index, pair) in segments.windows(2).enumerate() {
            let (mouth, throat) = match (pair[0].mouth_area(), pair[1].throat_area()) {
                (Some(m), Some(t)) => (m, t),
                _ => continue,
            };
            if (mouth - throat).abs() > CONTINUITY_TOLERANCE * mouth.max(throat) {
                return Err(ConfigurationError::AreaDiscontinuity {
                    index,
                    mouth,
                    throat,
                });
            }
        }
        Ok(Self {
            segments,
            front_chamber: None,
            rear_chamber: None,
        })
    }

    /// Driver radiating straight into the termination: no segments, no
    /// chambers.
    pub fn direct_radiator() -> Self {
        Self {
            segments: Vec::new(),
            front_chamber: None,
            rear_chamber: None,
        }
    }

    pub fn with_front_chamber(mut self, chamber: FrontChamber) -> Self {
        self.front_chamber = Some(chamber);
        self
    }

    pub fn with_rear_chamber(mut self, chamber: RearChamber) -> Self {
        self.rear_chamber = Some(chamber);
        self
    }

    pub fn segments(&self) -> &[HornSegment] {
        &self.segments
    }

    pub fn front_chamber(&self) -> Option<&FrontChamber> {
        self.front_chamber.as_ref()
    }

    pub fn rear_chamber(&self) -> Option<&RearChamber> {
        self.rear_chamber.as_ref()
    }

    /// Throat area of a flared chain attached directly to the driver.
    ///
    /// `None` when the chain is empty or starts with a chamber (the plenum
    /// decouples the diaphragm from the downstream flow area).
    pub fn driver_coupled_throat_area(&self) -> Option<f64> {
        self.segments.first().and_then(HornSegment::throat_area)
    }

    /// Area of the radiating mouth: the last flared segment's mouth, or `sd`
    /// for a direct radiator.
    pub fn radiating_area(&self, sd: f64) -> f64 {
        self.segments
            .iter()
            .rev()
            .find_map(HornSegment::mouth_area)
            .unwrap_or(sd)
    }

    /// Composite throat→mouth transfer matrix: front-chamber shunt (if any)
    /// chained with each segment in order. Empty chain ⇒ identity.
    pub fn front_matrix(&self, omega: f64, medium: &Medium) -> TransferMatrix {
        let mut total = match &self.front_chamber {
            Some(chamber) => chamber.transfer_matrix(omega, medium),
            None => TransferMatrix::identity(),
        };
        for segment in &self.segments {
            total = total.chain(&segment.transfer_matrix(omega, medium));
        }
        total
    }

    /// Reduce a known mouth termination impedance back to the throat plane:
    /// Z₁ = (a·Z_mouth + b)/(c·Z_mouth + d).
    pub fn throat_impedance(
        &self,
        omega: f64,
        medium: &Medium,
        z_mouth: Complex64,
    ) -> Complex64 {
        self.front_matrix(omega, medium).input_impedance(z_mouth)
    }

    /// Impedance loading the rear of the diaphragm; zero without a rear
    /// chamber (free rear side).
    pub fn rear_impedance(&self, omega: f64, medium: &Medium) -> Complex64 {
        match &self.rear_chamber {
            Some(chamber) => chamber.impedance(omega, medium),
            None => Complex64::new(0.0, 0.0),
        }
    }

    /// Cutoff frequencies of the flared segments, indexed by position in the
    /// chain.
    pub fn cutoff_frequencies(&self, speed_of_sound: f64) -> Vec<(usize, f64)> {
        self.segments
            .iter()
            .enumerate()
            .filter_map(|(i, s)| s.cutoff_frequency(speed_of_sound).map(|f| (i, f)))
            .collect()
    }
}
