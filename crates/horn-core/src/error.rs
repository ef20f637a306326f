use thiserror::Error;

/// Invariant violation detected while constructing a driver, enclosure, or
/// simulation. Always fatal and reported before any evaluation runs; never
/// silently corrected.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigurationError {
    #[error("{name} must be strictly positive, got {value}")]
    NonPositive { name: &'static str, value: f64 },

    #[error("{name} must not be negative, got {value}")]
    Negative { name: &'static str, value: f64 },

    /// Adjacent flared segments whose facing areas do not match.
    #[error("segment {index} mouth area {mouth} m² does not match the next segment's throat area {throat} m²")]
    AreaDiscontinuity {
        index: usize,
        mouth: f64,
        throat: f64,
    },

    /// Driver diaphragm area and the directly attached horn throat disagree.
    #[error("driver Sd {sd} m² does not match the horn throat area {throat} m²")]
    ThroatAreaMismatch { sd: f64, throat: f64 },

    /// A hyperbolic flare with this shape parameter cannot connect the two
    /// areas over the given length.
    #[error("hyperbolic segment with shape {shape} cannot expand from throat area {throat} m² to mouth area {mouth} m²")]
    HyperbolicFlareUnreachable {
        throat: f64,
        mouth: f64,
        shape: f64,
    },

    #[error("frequency sequence must be strictly increasing, violated at index {index}")]
    FrequenciesNotIncreasing { index: usize },

    #[error("frequency sequence contains a non-finite value at index {index}")]
    FrequencyNotFinite { index: usize },
}

/// Physically invalid evaluation request at a single frequency point.
///
/// Reported per point; a sweep carries on past it so callers can still
/// render a partial curve.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum DomainError {
    #[error("frequency must be strictly positive, got {frequency} Hz")]
    NonPositiveFrequency { frequency: f64 },

    #[error("frequency must be finite, got {frequency}")]
    NonFiniteFrequency { frequency: f64 },
}

/// Signal that a result sits near a numerically delicate region.
///
/// Carried alongside the result, never raised as an error.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PrecisionWarning {
    /// The evaluated frequency lies close to a flared segment's cutoff,
    /// where the propagation constant changes character.
    NearHornCutoff { segment: usize, cutoff_hz: f64 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_carry_values() {
        let err = ConfigurationError::NonPositive {
            name: "throat_area",
            value: -0.5,
        };
        let msg = err.to_string();
        assert!(msg.contains("throat_area"), "{msg}");
        assert!(msg.contains("-0.5"), "{msg}");

        let err = DomainError::NonPositiveFrequency { frequency: 0.0 };
        assert!(err.to_string().contains("0 Hz"), "{err}");
    }
}
