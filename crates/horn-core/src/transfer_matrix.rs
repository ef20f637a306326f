use num_complex::Complex64;

/// A 2×2 complex transfer matrix relating acoustic pressure and volume
/// velocity at the two ends of an element:
///
/// ```text
/// [p_throat]   [a  b] [p_mouth]
/// [U_throat] = [c  d] [U_mouth]
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransferMatrix {
    pub a: Complex64,
    pub b: Complex64,
    pub c: Complex64,
    pub d: Complex64,
}

impl TransferMatrix {
    pub fn new(a: Complex64, b: Complex64, c: Complex64, d: Complex64) -> Self {
        Self { a, b, c, d }
    }

    /// Identity matrix (no-op element).
    pub fn identity() -> Self {
        Self {
            a: Complex64::new(1.0, 0.0),
            b: Complex64::new(0.0, 0.0),
            c: Complex64::new(0.0, 0.0),
            d: Complex64::new(1.0, 0.0),
        }
    }

    /// Series impedance `z` in the acoustic path: [[1, z], [0, 1]].
    pub fn series_impedance(z: Complex64) -> Self {
        Self {
            a: Complex64::new(1.0, 0.0),
            b: z,
            c: Complex64::new(0.0, 0.0),
            d: Complex64::new(1.0, 0.0),
        }
    }

    /// Shunt admittance `y` across the path: [[1, 0], [y, 1]].
    pub fn shunt_admittance(y: Complex64) -> Self {
        Self {
            a: Complex64::new(1.0, 0.0),
            b: Complex64::new(0.0, 0.0),
            c: y,
            d: Complex64::new(1.0, 0.0),
        }
    }

    /// Chain (multiply) this matrix with another: self · other.
    ///
    /// Matrix multiplication is non-commutative; callers compose throat to
    /// mouth in the order the segments appear.
    pub fn chain(&self, other: &TransferMatrix) -> TransferMatrix {
        TransferMatrix {
            a: self.a * other.a + self.b * other.c,
            b: self.a * other.b + self.b * other.d,
            c: self.c * other.a + self.d * other.c,
            d: self.c * other.b + self.d * other.d,
        }
    }

    /// Determinant ad − bc. Equals 1 for any lossless reciprocal element.
    pub fn determinant(&self) -> Complex64 {
        self.a * self.d - self.b * self.c
    }

    /// Impedance seen at the input plane when the output plane is closed by
    /// `z_load`: (a·Z + b) / (c·Z + d).
    pub fn input_impedance(&self, z_load: Complex64) -> Complex64 {
        (self.a * z_load + self.b) / (self.c * z_load + self.d)
    }
}
