//! Bessel and Struve function evaluators used by the piston radiation
//! impedance.
//!
//! J₀ and J₁ follow the Abramowitz & Stegun §9.4 rational approximations
//! (|error| below ~1e-7 over the full real line). The Struve function H₁
//! uses its power series up to |x| = 7, where the alternating terms still
//! cancel to well under 1e-9, and the Aarts & Janssen (2003) trigonometric
//! approximation beyond, whose absolute error stays below 5e-3.

use std::f64::consts::PI;

/// Argument above which `struve_h1` switches from the power series to the
/// Aarts & Janssen approximation.
const STRUVE_SERIES_LIMIT: f64 = 7.0;

/// Bessel function of the first kind, order zero.
pub fn bessel_j0(x: f64) -> f64 {
    let ax = x.abs();
    if ax < 8.0 {
        let y = x * x;
        let p1 = 57568490574.0
            + y * (-13362590354.0
                + y * (651619640.7
                    + y * (-11214424.18 + y * (77392.33017 + y * (-184.9052456)))));
        let p2 = 57568490411.0
            + y * (1029532985.0
                + y * (9494680.718 + y * (59272.64853 + y * (267.8532712 + y))));
        p1 / p2
    } else {
        let z = 8.0 / ax;
        let y = z * z;
        let xx = ax - 0.785398164;
        let p1 = 1.0
            + y * (-0.1098628627e-2
                + y * (0.2734510407e-4 + y * (-0.2073370639e-5 + y * 0.2093887211e-6)));
        let p2 = -0.1562499995e-1
            + y * (0.1430488765e-3
                + y * (-0.6911147651e-5 + y * (0.7621095161e-6 + y * (-0.934935152e-7))));
        (0.636619772 / ax).sqrt() * (xx.cos() * p1 - z * xx.sin() * p2)
    }
}

/// Bessel function of the first kind, order one.
pub fn bessel_j1(x: f64) -> f64 {
    let ax = x.abs();
    if ax < 8.0 {
        let y = x * x;
        let p1 = x
            * (72362614232.0
                + y * (-7895059235.0
                    + y * (242396853.1
                        + y * (-2972611.439 + y * (15704.48260 + y * (-30.16036606))))));
        let p2 = 144725228442.0
            + y * (2300535178.0
                + y * (18583304.74 + y * (99447.43394 + y * (376.9991397 + y))));
        p1 / p2
    } else {
        let z = 8.0 / ax;
        let y = z * z;
        let xx = ax - 2.356194491;
        let p1 = 1.0
            + y * (0.183105e-2
                + y * (-0.3516396496e-4 + y * (0.2457520174e-5 + y * (-0.240337019e-6))));
        let p2 = 0.04687499995
            + y * (-0.2002690873e-3
                + y * (0.8449199096e-5 + y * (-0.88228987e-6 + y * 0.105787412e-6)));
        let ans = (0.636619772 / ax).sqrt() * (xx.cos() * p1 - z * xx.sin() * p2);
        if x < 0.0 {
            -ans
        } else {
            ans
        }
    }
}

/// Struve function H₁. Even in its argument.
pub fn struve_h1(x: f64) -> f64 {
    let ax = x.abs();
    if ax <= STRUVE_SERIES_LIMIT {
        struve_h1_series(ax)
    } else {
        struve_h1_aarts_janssen(ax)
    }
}

/// Power series: H₁(x) = Σ (−1)ᵏ (x/2)^(2k+2) / (Γ(k+3/2)·Γ(k+5/2)).
///
/// The leading term is 2x²/(3π); successive terms follow from the ratio
/// −(x/2)² / ((k+3/2)(k+5/2)).
fn struve_h1_series(x: f64) -> f64 {
    let q = 0.25 * x * x; // (x/2)²
    let mut term = 2.0 * x * x / (3.0 * PI);
    let mut sum = term;
    for k in 0..60 {
        let kf = k as f64;
        term *= -q / ((kf + 1.5) * (kf + 2.5));
        sum += term;
        if term.abs() < 1e-17 * sum.abs().max(1e-300) {
            break;
        }
    }
    sum
}

/// Aarts & Janssen (2003): H₁(x) ≈ 2/π − J₀(x)
///   + (16/π − 5)·sin(x)/x + (12 − 36/π)·(1 − cos(x))/x².
fn struve_h1_aarts_janssen(x: f64) -> f64 {
    2.0 / PI - bessel_j0(x)
        + (16.0 / PI - 5.0) * x.sin() / x
        + (12.0 - 36.0 / PI) * (1.0 - x.cos()) / (x * x)
}
