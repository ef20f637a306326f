//! Frequency-domain simulation engine for a loudspeaker driver coupled to a
//! horn or box enclosure.
//!
//! The signal chain per frequency: piston radiation impedance at the mouth
//! ([`radiation`]) → transfer-matrix reduction through the segment chain
//! ([`segments`], [`enclosure`]) → Thiele-Small equivalent-circuit solve
//! ([`driver`]) → electrical impedance, diaphragm motion, and SPL
//! ([`sweep`]).
//!
//! Everything is a closed-form evaluation: no iterative solvers, no shared
//! mutable state, one independent result per frequency.

pub mod constants;
pub mod driver;
pub mod enclosure;
pub mod error;
pub mod radiation;
pub mod segments;
pub mod special;
pub mod sweep;
pub mod transfer_matrix;

pub use constants::Medium;
pub use driver::{DriveState, Driver};
pub use enclosure::{Enclosure, FrontChamber, RearChamber};
pub use error::{ConfigurationError, DomainError, PrecisionWarning};
pub use radiation::RadiationSpace;
pub use segments::HornSegment;
pub use sweep::{FrequencyPoint, Simulation};
pub use transfer_matrix::TransferMatrix;

/// Build a simulation and sweep it in one call.
///
/// Convenience wrapper for sweep requesters that don't need to hold the
/// [`Simulation`] across calls.
pub fn sweep_response(
    driver: Driver,
    enclosure: Enclosure,
    medium: Medium,
    space: RadiationSpace,
    drive_voltage: f64,
    frequencies: &[f64],
) -> Result<Vec<Result<FrequencyPoint, DomainError>>, ConfigurationError> {
    Simulation::new(driver, enclosure, medium, space, drive_voltage)?.run(frequencies)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sweep_response_end_to_end() {
        let driver = Driver::new(0.022, 2.6, 0.0, 7.3, 0.020, 1.2e-3, 0.8).unwrap();
        let frequencies = sweep::log_spaced(20.0, 2000.0, 30);
        let results = sweep_response(
            driver,
            Enclosure::direct_radiator(),
            Medium::default(),
            RadiationSpace::HalfSpace,
            2.83,
            &frequencies,
        )
        .unwrap();
        assert_eq!(results.len(), 30);
        for point in results {
            let point = point.unwrap();
            assert!(point.spl_db.is_finite());
            // Passive load: driving-point resistance never drops below R_e.
            assert!(point.electrical_impedance.re >= 2.6 - 1e-9);
        }
    }
}
