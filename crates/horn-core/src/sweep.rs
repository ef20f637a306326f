//! Frequency sweep engine: evaluates the radiation → chain → driver-circuit
//! signal path at each requested frequency and assembles the response curve.

use log::{debug, warn};
use num_complex::Complex64;
use std::f64::consts::PI;

use crate::constants::{Medium, REFERENCE_DISTANCE, REFERENCE_PRESSURE};
use crate::driver::Driver;
use crate::enclosure::Enclosure;
use crate::error::{ConfigurationError, DomainError, PrecisionWarning};
use crate::radiation::{self, RadiationSpace};

/// Relative distance to a segment cutoff below which a precision warning is
/// attached to the point.
const CUTOFF_PROXIMITY: f64 = 0.02;

/// Relative tolerance for the driver-throat area match.
const THROAT_MATCH_TOLERANCE: f64 = 1e-6;

/// One evaluated frequency point. Produced fresh per sweep, never mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct FrequencyPoint {
    /// Frequency in Hz.
    pub frequency: f64,
    /// Driving-point electrical impedance (Ω).
    pub electrical_impedance: Complex64,
    /// Diaphragm velocity (m/s).
    pub velocity: Complex64,
    /// Diaphragm displacement (m).
    pub displacement: Complex64,
    /// Sound pressure level in dB re 20 µPa at 1 m.
    pub spl_db: f64,
    /// Acoustic impedance loading the diaphragm's front face (Pa·s/m³).
    pub throat_impedance: Complex64,
    /// Numerical-delicacy signals for this point; empty in the common case.
    pub warnings: Vec<PrecisionWarning>,
}

/// A configured simulation: driver, enclosure, environment, and drive level.
///
/// Construction validates everything the sweep relies on; evaluation after
/// that is a pure function of the frequency, so callers may shard a
/// frequency list across threads without coordination.
#[derive(Debug, Clone)]
pub struct Simulation {
    driver: Driver,
    enclosure: Enclosure,
    medium: Medium,
    space: RadiationSpace,
    drive_voltage: f64,
    /// Flared-segment cutoffs, cached at construction (frequency-independent).
    cutoffs: Vec<(usize, f64)>,
}

impl Simulation {
    pub fn new(
        driver: Driver,
        enclosure: Enclosure,
        medium: Medium,
        space: RadiationSpace,
        drive_voltage: f64,
    ) -> Result<Self, ConfigurationError> {
        if !(drive_voltage > 0.0 && drive_voltage.is_finite()) {
            return Err(ConfigurationError::NonPositive {
                name: "drive_voltage",
                value: drive_voltage,
            });
        }
        if let Some(throat) = enclosure.driver_coupled_throat_area() {
            let sd = driver.sd;
            if (sd - throat).abs() > THROAT_MATCH_TOLERANCE * sd.max(throat) {
                return Err(ConfigurationError::ThroatAreaMismatch { sd, throat });
            }
        }
        let cutoffs = enclosure.cutoff_frequencies(medium.speed_of_sound);
        Ok(Self {
            driver,
            enclosure,
            medium,
            space,
            drive_voltage,
            cutoffs,
        })
    }

    pub fn driver(&self) -> &Driver {
        &self.driver
    }

    pub fn enclosure(&self) -> &Enclosure {
        &self.enclosure
    }

    pub fn medium(&self) -> &Medium {
        &self.medium
    }

    /// Evaluate the full chain at one frequency.
    pub fn evaluate(&self, frequency: f64) -> Result<FrequencyPoint, DomainError> {
        if !frequency.is_finite() {
            return Err(DomainError::NonFiniteFrequency { frequency });
        }
        if frequency <= 0.0 {
            return Err(DomainError::NonPositiveFrequency { frequency });
        }
        let omega = 2.0 * PI * frequency;

        let mouth_area = self.enclosure.radiating_area(self.driver.sd);
        let z_mouth = radiation::piston(mouth_area, frequency, &self.medium, self.space);
        let z_front = self.enclosure.throat_impedance(omega, &self.medium, z_mouth);
        let z_rear = self.enclosure.rear_impedance(omega, &self.medium);

        let state = self
            .driver
            .solve(omega, self.drive_voltage, z_front, z_rear);

        Ok(FrequencyPoint {
            frequency,
            electrical_impedance: state.electrical_impedance,
            velocity: state.velocity,
            displacement: state.displacement,
            spl_db: self.spl_db(state.volume_velocity, z_front),
            throat_impedance: z_front,
            warnings: self.cutoff_warnings(frequency),
        })
    }

    /// SPL at the reference distance from the radiated power
    /// P = |U|²·Re(Z_front) (drive voltage is RMS), spread over the
    /// configured solid angle.
    fn spl_db(&self, volume_velocity: Complex64, z_front: Complex64) -> f64 {
        let power = volume_velocity.norm_sqr() * z_front.re;
        let intensity =
            power / (self.space.solid_angle() * REFERENCE_DISTANCE * REFERENCE_DISTANCE);
        let pressure_sq = intensity * self.medium.density * self.medium.speed_of_sound;
        10.0 * (pressure_sq / (REFERENCE_PRESSURE * REFERENCE_PRESSURE)).log10()
    }

    fn cutoff_warnings(&self, frequency: f64) -> Vec<PrecisionWarning> {
        self.cutoffs
            .iter()
            .filter(|(_, cutoff)| ((frequency - cutoff) / cutoff).abs() < CUTOFF_PROXIMITY)
            .map(|&(segment, cutoff_hz)| {
                warn!(
                    "{frequency:.2} Hz is within {:.0}% of segment {segment} cutoff {cutoff_hz:.2} Hz",
                    CUTOFF_PROXIMITY * 100.0
                );
                PrecisionWarning::NearHornCutoff { segment, cutoff_hz }
            })
            .collect()
    }

    /// Sweep an ordered, strictly increasing frequency sequence.
    ///
    /// The sequence itself is validated up front (fatal); each point is then
    /// evaluated independently and in order, and a per-point [`DomainError`]
    /// never aborts the remainder, so callers can render partial curves.
    pub fn run(
        &self,
        frequencies: &[f64],
    ) -> Result<Vec<Result<FrequencyPoint, DomainError>>, ConfigurationError> {
        let mut previous: Option<f64> = None;
        for (index, &f) in frequencies.iter().enumerate() {
            if !f.is_finite() {
                return Err(ConfigurationError::FrequencyNotFinite { index });
            }
            if let Some(p) = previous {
                if f <= p {
                    return Err(ConfigurationError::FrequenciesNotIncreasing { index });
                }
            }
            previous = Some(f);
        }
        debug!(
            "sweeping {} points, {:.2}-{:.2} Hz",
            frequencies.len(),
            frequencies.first().copied().unwrap_or(0.0),
            frequencies.last().copied().unwrap_or(0.0)
        );
        Ok(frequencies.iter().map(|&f| self.evaluate(f)).collect())
    }
}

/// `count` logarithmically spaced frequencies from `f_start` to `f_stop`
/// inclusive.
pub fn log_spaced(f_start: f64, f_stop: f64, count: usize) -> Vec<f64> {
    if count == 0 {
        return Vec::new();
    }
    if count == 1 {
        return vec![f_start];
    }
    let ratio = f_stop / f_start;
    (0..count)
        .map(|i| f_start * ratio.powf(i as f64 / (count - 1) as f64))
        .collect()
}

/// `count` linearly spaced frequencies from `f_start` to `f_stop` inclusive.
pub fn linear_spaced(f_start: f64, f_stop: f64, count: usize) -> Vec<f64> {
    if count == 0 {
        return Vec::new();
    }
    if count == 1 {
        return vec![f_start];
    }
    let step = (f_stop - f_start) / (count - 1) as f64;
    (0..count).map(|i| f_start + step * i as f64).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enclosure::RearChamber;
    use crate::segments::HornSegment;

    fn test_driver() -> Driver {
        Driver::new(0.022, 2.6, 0.0, 7.3, 0.020, 1.2e-3, 0.8).unwrap()
    }

    fn simulation(enclosure: Enclosure) -> Simulation {
        Simulation::new(
            test_driver(),
            enclosure,
            Medium::default(),
            RadiationSpace::HalfSpace,
            2.83,
        )
        .unwrap()
    }

    /// Scan |Z| on a uniform grid and return (frequency, magnitude) of the
    /// largest value.
    fn impedance_peak(sim: &Simulation, lo: f64, hi: f64, step: f64) -> (f64, f64) {
        let mut best = (lo, 0.0);
        let mut f = lo;
        while f <= hi {
            let mag = sim
                .evaluate(f)
                .unwrap()
                .electrical_impedance
                .norm();
            if mag > best.1 {
                best = (f, mag);
            }
            f += step;
        }
        best
    }

    // -----------------------------------------------------------------------
    // Scenario: sealed box
    // -----------------------------------------------------------------------

    /// Enclosing the rear in a volume V_b moves the impedance peak from F_s
    /// to F_c = F_s·sqrt(1 + V_as/V_b). Both peaks are located with the same
    /// front radiation load, so the radiation mass cancels in the ratio.
    #[test]
    fn test_sealed_box_resonance_shift() {
        let medium = Medium::default();
        let driver = test_driver();
        let vas = driver.vas(&medium);
        let v_box = vas / 2.0; // alpha = 2
        let expected_ratio = 3.0_f64.sqrt();

        let free_air = simulation(Enclosure::direct_radiator());
        let sealed = simulation(
            Enclosure::direct_radiator()
                .with_rear_chamber(RearChamber::new(v_box, 0.0).unwrap()),
        );

        let (f_s, _) = impedance_peak(&free_air, 15.0, 60.0, 0.02);
        let (f_c, _) = impedance_peak(&sealed, 30.0, 90.0, 0.02);

        let f_c_expected = f_s * expected_ratio;
        assert!(
            (f_c - f_c_expected).abs() < 1.0,
            "sealed peak at {f_c:.2} Hz, expected {f_c_expected:.2} Hz (free-air peak {f_s:.2} Hz)"
        );
        eprintln!(
            "sealed box: F_s = {f_s:.2} Hz, F_c = {f_c:.2} Hz, ratio = {:.4} (expected {expected_ratio:.4})",
            f_c / f_s
        );
    }

    // -----------------------------------------------------------------------
    // Scenario: ported box
    // -----------------------------------------------------------------------

    /// A box volume with a port duct behind it shows the classic dual
    /// impedance peaks straddling a minimum near R_e at the Helmholtz
    /// tuning.
    #[test]
    fn test_ported_box_dual_peaks() {
        let v_box = 0.040;
        let port_area = 0.005;
        let port_length = 0.1;
        let enclosure = Enclosure::new(vec![
            HornSegment::chamber(v_box).unwrap(),
            HornSegment::conical(port_area, port_area, port_length).unwrap(),
        ])
        .unwrap();
        let sim = simulation(enclosure);
        let re = sim.driver().re;

        let frequencies = linear_spaced(15.0, 150.0, 2701); // 0.05 Hz grid
        let magnitudes: Vec<(f64, f64)> = sim
            .run(&frequencies)
            .unwrap()
            .into_iter()
            .map(|p| {
                let p = p.unwrap();
                (p.frequency, p.electrical_impedance.norm())
            })
            .collect();

        // Local maxima well above R_e.
        let peaks: Vec<f64> = magnitudes
            .windows(3)
            .filter(|w| w[1].1 > w[0].1 && w[1].1 > w[2].1 && w[1].1 > 2.0 * re)
            .map(|w| w[1].0)
            .collect();
        assert_eq!(peaks.len(), 2, "expected two impedance peaks, got {peaks:?}");

        // The minimum between the peaks sits near R_e at the tuning.
        let (f_min, z_min) = magnitudes
            .iter()
            .filter(|(f, _)| *f > peaks[0] && *f < peaks[1])
            .fold((0.0, f64::INFINITY), |acc, &(f, m)| {
                if m < acc.1 {
                    (f, m)
                } else {
                    acc
                }
            });
        assert!(
            peaks[0] < f_min && f_min < peaks[1],
            "minimum {f_min} Hz should sit between the peaks {peaks:?}"
        );
        assert!(
            z_min < 1.25 * re,
            "minimum impedance {z_min:.2} Ω should be close to R_e = {re} Ω"
        );
        // Helmholtz estimate sqrt(S/(V·L))·c/2π ≈ 61 Hz shifts down with the
        // port's radiation end loading; the minimum stays in that vicinity.
        assert!(
            (40.0..72.0).contains(&f_min),
            "tuning minimum at {f_min} Hz"
        );
        eprintln!("ported box: peaks {peaks:?}, minimum {z_min:.2} Ω at {f_min:.1} Hz");
    }

    // -----------------------------------------------------------------------
    // Horn sweep behavior
    // -----------------------------------------------------------------------

    fn horn_simulation() -> Simulation {
        let driver = Driver::new(0.02, 5.6, 0.5e-3, 12.0, 0.015, 8.0e-4, 1.5).unwrap();
        let enclosure = Enclosure::new(vec![
            HornSegment::exponential(0.02, 0.5, 1.2).unwrap(),
        ])
        .unwrap();
        Simulation::new(
            driver,
            enclosure,
            Medium::default(),
            RadiationSpace::HalfSpace,
            2.83,
        )
        .unwrap()
    }

    #[test]
    fn test_three_decade_sweep_stays_finite() {
        let sim = horn_simulation();
        let frequencies = log_spaced(10.0, 20_000.0, 240);
        let results = sim.run(&frequencies).unwrap();
        assert_eq!(results.len(), frequencies.len());
        for (point, &f) in results.iter().zip(&frequencies) {
            let point = point.as_ref().unwrap();
            assert_eq!(point.frequency, f);
            assert!(
                point.electrical_impedance.norm().is_finite(),
                "Z not finite at {f} Hz"
            );
            assert!(point.velocity.norm().is_finite(), "v not finite at {f} Hz");
            assert!(point.spl_db.is_finite(), "SPL not finite at {f} Hz");
            // Driving-point resistance of a passive system stays positive.
            assert!(
                point.electrical_impedance.re > 0.0,
                "Re(Z) = {} at {f} Hz",
                point.electrical_impedance.re
            );
        }
    }

    #[test]
    fn test_near_cutoff_warning() {
        let sim = horn_simulation();
        let f_c = sim.enclosure().segments()[0]
            .cutoff_frequency(sim.medium().speed_of_sound)
            .unwrap();

        let near = sim.evaluate(f_c * 1.01).unwrap();
        assert!(
            matches!(
                near.warnings.as_slice(),
                [PrecisionWarning::NearHornCutoff { segment: 0, .. }]
            ),
            "expected a cutoff warning at {:.1} Hz, got {:?}",
            f_c * 1.01,
            near.warnings
        );

        let far = sim.evaluate(f_c * 1.5).unwrap();
        assert!(far.warnings.is_empty(), "unexpected warnings {:?}", far.warnings);
    }

    #[test]
    fn test_direct_radiator_midband_spl_is_plausible() {
        let sim = simulation(Enclosure::direct_radiator());
        let spl = sim.evaluate(200.0).unwrap().spl_db;
        // A 7.3 T·m / 2.6 Ω / 220 cm² driver at 2.83 V sits in the 90s.
        assert!((80.0..115.0).contains(&spl), "SPL = {spl} dB");
    }

    #[test]
    fn test_displacement_falls_above_resonance() {
        let sim = simulation(Enclosure::direct_radiator());
        let f_s = sim.driver().free_resonance();
        let below = sim.evaluate(f_s / 3.0).unwrap().displacement.norm();
        let above = sim.evaluate(f_s * 8.0).unwrap().displacement.norm();
        assert!(
            below > 10.0 * above,
            "displacement should be stiffness-limited below resonance: {below} vs {above}"
        );
    }

    // -----------------------------------------------------------------------
    // Sweep contract
    // -----------------------------------------------------------------------

    #[test]
    fn test_run_rejects_unordered_sequences() {
        let sim = simulation(Enclosure::direct_radiator());
        assert!(matches!(
            sim.run(&[100.0, 50.0]),
            Err(ConfigurationError::FrequenciesNotIncreasing { index: 1 })
        ));
        assert!(matches!(
            sim.run(&[50.0, 50.0]),
            Err(ConfigurationError::FrequenciesNotIncreasing { index: 1 })
        ));
        assert!(matches!(
            sim.run(&[50.0, f64::NAN]),
            Err(ConfigurationError::FrequencyNotFinite { index: 1 })
        ));
    }

    #[test]
    fn test_domain_error_does_not_abort_sweep() {
        let sim = simulation(Enclosure::direct_radiator());
        // Strictly increasing, but the first point is unphysical.
        let results = sim.run(&[-5.0, 100.0, 200.0]).unwrap();
        assert_eq!(results.len(), 3);
        assert!(matches!(
            results[0],
            Err(DomainError::NonPositiveFrequency { .. })
        ));
        assert!(results[1].is_ok() && results[2].is_ok());
    }

    #[test]
    fn test_throat_mismatch_rejected_at_construction() {
        let enclosure = Enclosure::new(vec![
            HornSegment::exponential(0.03, 0.5, 1.2).unwrap(),
        ])
        .unwrap();
        let err = Simulation::new(
            test_driver(), // sd = 0.022
            enclosure,
            Medium::default(),
            RadiationSpace::HalfSpace,
            2.83,
        )
        .unwrap_err();
        assert!(
            matches!(err, ConfigurationError::ThroatAreaMismatch { .. }),
            "{err:?}"
        );
    }

    #[test]
    fn test_nonpositive_drive_voltage_rejected() {
        let err = Simulation::new(
            test_driver(),
            Enclosure::direct_radiator(),
            Medium::default(),
            RadiationSpace::HalfSpace,
            0.0,
        )
        .unwrap_err();
        assert!(
            matches!(err, ConfigurationError::NonPositive { name: "drive_voltage", .. }),
            "{err:?}"
        );
    }

    #[test]
    fn test_spacing_helpers() {
        let log = log_spaced(10.0, 10_000.0, 4);
        assert_eq!(log.len(), 4);
        assert!((log[0] - 10.0).abs() < 1e-12);
        assert!((log[3] - 10_000.0).abs() < 1e-6);
        assert!((log[1] - 100.0).abs() < 1e-9 && (log[2] - 1000.0).abs() < 1e-9);

        let lin = linear_spaced(20.0, 100.0, 5);
        assert_eq!(lin, vec![20.0, 40.0, 60.0, 80.0, 100.0]);

        assert!(log_spaced(10.0, 100.0, 0).is_empty());
        assert_eq!(linear_spaced(42.0, 99.0, 1), vec![42.0]);

        for w in log.windows(2) {
            assert!(w[1] > w[0]);
        }
    }
}
