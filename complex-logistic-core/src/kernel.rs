use serde::Serialize;

use crate::complex::Complex;
use crate::error::CoreError;

/// Orbits start here; `1/2` is the critical point of `z·(1 − z)`.
pub const ORBIT_SEED: Complex = Complex { re: 0.5, im: 0.0 };

/// An orbit has escaped once `|z|²` is no longer `<= ESCAPE_NORM_SQ`.
pub const ESCAPE_NORM_SQ: f64 = 1.0;

/// Escape classification shared by both kernel paths.
///
/// `|z|² == 1` is bounded. A non-finite norm (overflow to `inf`, or `NaN`
/// from `inf − inf`) counts as escaped.
#[inline]
fn has_escaped(norm_sq: f64) -> bool {
    !(norm_sq <= ESCAPE_NORM_SQ)
}

/// Iteration counts for the two kernel paths.
///
/// The batch path has no per-element early exit, so it runs fewer steps and
/// classifies by the final magnitude only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct KernelParams {
    pub scalar_iterations: u32,
    pub batch_iterations: u32,
}

impl<'de> serde::Deserialize<'de> for KernelParams {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(serde::Deserialize)]
        struct Raw {
            #[serde(default = "default_scalar_iterations")]
            scalar_iterations: u32,
            #[serde(default = "default_batch_iterations")]
            batch_iterations: u32,
        }
        let raw = Raw::deserialize(deserializer)?;
        KernelParams::new(raw.scalar_iterations, raw.batch_iterations)
            .map_err(serde::de::Error::custom)
    }
}

fn default_scalar_iterations() -> u32 {
    KernelParams::DEFAULT_SCALAR_ITERATIONS
}

fn default_batch_iterations() -> u32 {
    KernelParams::DEFAULT_BATCH_ITERATIONS
}

impl KernelParams {
    pub const DEFAULT_SCALAR_ITERATIONS: u32 = 512;
    pub const DEFAULT_BATCH_ITERATIONS: u32 = 400;

    pub fn new(scalar_iterations: u32, batch_iterations: u32) -> crate::Result<Self> {
        if scalar_iterations < 1 {
            return Err(CoreError::InvalidIterations(scalar_iterations));
        }
        if batch_iterations < 1 {
            return Err(CoreError::InvalidIterations(batch_iterations));
        }
        Ok(Self {
            scalar_iterations,
            batch_iterations,
        })
    }
}

impl Default for KernelParams {
    fn default() -> Self {
        Self {
            scalar_iterations: Self::DEFAULT_SCALAR_ITERATIONS,
            batch_iterations: Self::DEFAULT_BATCH_ITERATIONS,
        }
    }
}

/// An escape-time test over points of the parameter plane.
///
/// `true` always means *escaped*. Schedulers are generic over
/// `K: EscapeKernel + Sync` so the batch loop is statically dispatched.
pub trait EscapeKernel {
    /// Classify a single point.
    fn escapes(&self, a: Complex) -> bool;

    /// Classify every point of `points`, writing `out[k]` for `points[k]`.
    ///
    /// Fails without touching `out` if the lengths differ or an input point
    /// is not finite.
    fn escapes_batch_into(&self, points: &[Complex], out: &mut [bool]) -> crate::Result<()>;

    /// Allocating form of [`escapes_batch_into`](Self::escapes_batch_into).
    fn escapes_batch(&self, points: &[Complex]) -> crate::Result<Vec<bool>> {
        let mut out = vec![false; points.len()];
        self.escapes_batch_into(points, &mut out)?;
        Ok(out)
    }
}

/// The complex logistic map `z ← a·z·(1 − z)`, parameterised by `a`.
#[derive(Debug, Clone, Default)]
pub struct LogisticMap {
    params: KernelParams,
}

impl LogisticMap {
    pub fn new(params: KernelParams) -> Self {
        Self { params }
    }
}

impl EscapeKernel for LogisticMap {
    fn escapes(&self, a: Complex) -> bool {
        let mut z = ORBIT_SEED;
        for _ in 0..self.params.scalar_iterations {
            // a·z·(1 − z), grouped as (z − z²)·a to round exactly like the
            // batch lanes.
            z = (z - z * z) * a;
            if has_escaped(z.norm_sq()) {
                return true;
            }
        }
        false
    }

    fn escapes_batch_into(&self, points: &[Complex], out: &mut [bool]) -> crate::Result<()> {
        if points.len() != out.len() {
            return Err(CoreError::BatchLengthMismatch {
                points: points.len(),
                out: out.len(),
            });
        }
        if let Some(index) = points.iter().position(|p| !p.is_finite()) {
            return Err(CoreError::NonFiniteSample { index });
        }

        let mut lanes = Lanes::new(points);
        for _ in 0..self.params.batch_iterations {
            lanes.step();
        }
        lanes.classify(out);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Structure-of-arrays batch state
// ---------------------------------------------------------------------------

/// Dense per-component arrays for one batch.
///
/// Each stage below walks whole arrays with no branches so the compiler can
/// vectorise it.
struct Lanes {
    a_re: Vec<f64>,
    a_im: Vec<f64>,
    z_re: Vec<f64>,
    z_im: Vec<f64>,
    sq_re: Vec<f64>,
    sq_im: Vec<f64>,
}

impl Lanes {
    fn new(points: &[Complex]) -> Self {
        let n = points.len();
        Self {
            a_re: points.iter().map(|p| p.re).collect(),
            a_im: points.iter().map(|p| p.im).collect(),
            z_re: vec![ORBIT_SEED.re; n],
            z_im: vec![ORBIT_SEED.im; n],
            sq_re: vec![0.0; n],
            sq_im: vec![0.0; n],
        }
    }

    /// One application of `z ← (z − z²)·a` across every lane.
    fn step(&mut self) {
        // sq = z²
        sub_products(&mut self.sq_re, &self.z_re, &self.z_re, &self.z_im, &self.z_im);
        double_products(&mut self.sq_im, &self.z_re, &self.z_im);

        // z = z − sq
        sub_assign(&mut self.z_re, &self.sq_re);
        sub_assign(&mut self.z_im, &self.sq_im);

        // z = z · a, staged through sq so both parts read the old z.
        sub_products(&mut self.sq_re, &self.z_re, &self.a_re, &self.z_im, &self.a_im);
        add_products(&mut self.sq_im, &self.z_re, &self.a_im, &self.z_im, &self.a_re);
        std::mem::swap(&mut self.z_re, &mut self.sq_re);
        std::mem::swap(&mut self.z_im, &mut self.sq_im);
    }

    fn classify(&self, out: &mut [bool]) {
        for ((o, re), im) in out.iter_mut().zip(&self.z_re).zip(&self.z_im) {
            *o = has_escaped(re * re + im * im);
        }
    }
}

/// `out[k] = a[k]·b[k] − c[k]·d[k]`
#[inline]
fn sub_products(out: &mut [f64], a: &[f64], b: &[f64], c: &[f64], d: &[f64]) {
    for ((((o, a), b), c), d) in out.iter_mut().zip(a).zip(b).zip(c).zip(d) {
        *o = a * b - c * d;
    }
}

/// `out[k] = a[k]·b[k] + c[k]·d[k]`
#[inline]
fn add_products(out: &mut [f64], a: &[f64], b: &[f64], c: &[f64], d: &[f64]) {
    for ((((o, a), b), c), d) in out.iter_mut().zip(a).zip(b).zip(c).zip(d) {
        *o = a * b + c * d;
    }
}

/// `out[k] = 2·a[k]·b[k]`
#[inline]
fn double_products(out: &mut [f64], a: &[f64], b: &[f64]) {
    for ((o, a), b) in out.iter_mut().zip(a).zip(b) {
        *o = 2.0 * a * b;
    }
}

#[inline]
fn sub_assign(acc: &mut [f64], rhs: &[f64]) {
    for (x, r) in acc.iter_mut().zip(rhs) {
        *x -= r;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map() -> LogisticMap {
        LogisticMap::default()
    }

    #[test]
    fn default_params() {
        let p = KernelParams::default();
        assert_eq!(p.scalar_iterations, 512);
        assert_eq!(p.batch_iterations, 400);
    }

    #[test]
    fn invalid_params() {
        assert_eq!(
            KernelParams::new(0, 400).unwrap_err(),
            CoreError::InvalidIterations(0)
        );
        assert!(KernelParams::new(512, 0).is_err());
        assert!(KernelParams::new(1, 1).is_ok());
    }

    #[test]
    fn zero_parameter_collapses_and_stays_bounded() {
        assert!(!map().escapes(Complex::ZERO));
        assert_eq!(map().escapes_batch(&[Complex::ZERO]).unwrap(), vec![false]);
    }

    #[test]
    fn large_real_parameter_escapes() {
        for re in [4.5, 5.0, 10.0, 100.0, 1e6] {
            for im in [-3.0, 0.0, 2.5] {
                assert!(map().escapes(Complex::new(re, im)), "a = {re} + {im}i");
            }
        }
    }

    #[test]
    fn unit_norm_is_bounded() {
        // a = 4: z goes 0.5 → 1.0 (|z|² == 1, bounded) → 0 → 0 …
        assert!(!map().escapes(Complex::new(4.0, 0.0)));
        assert_eq!(
            map().escapes_batch(&[Complex::new(4.0, 0.0)]).unwrap(),
            vec![false]
        );
    }

    #[test]
    fn real_unit_interval_parameters_are_bounded() {
        // For real a in [0, 4] the orbit never leaves [0, 1].
        for a in [0.5, 1.0, 2.0, 3.0, 3.5, 3.9] {
            assert!(!map().escapes(Complex::new(a, 0.0)), "a = {a}");
        }
    }

    #[test]
    fn single_step_kernel_matches_hand_computation() {
        // One step from 0.5 with a = 8i lands on 2i, |z|² = 4.
        let one = LogisticMap::new(KernelParams::new(1, 1).unwrap());
        let a = Complex::new(0.0, 8.0);
        assert!(one.escapes(a));
        assert_eq!(one.escapes_batch(&[a]).unwrap(), vec![true]);

        // a = 2: 0.5 is a fixed point.
        let a = Complex::new(2.0, 0.0);
        assert!(!one.escapes(a));
        assert_eq!(one.escapes_batch(&[a]).unwrap(), vec![false]);
    }

    #[test]
    fn overflowing_lanes_classify_as_escaped() {
        // The batch path keeps iterating after escape; the orbit overflows
        // to inf/NaN, which must still read as escaped.
        let points = [Complex::new(1e6, 1e6), Complex::new(-50.0, 0.0)];
        assert_eq!(map().escapes_batch(&points).unwrap(), vec![true, true]);
    }

    #[test]
    fn batch_rejects_length_mismatch() {
        let mut out = [false; 1];
        let err = map()
            .escapes_batch_into(&[Complex::ZERO, Complex::new(1.0, 0.0)], &mut out)
            .unwrap_err();
        assert_eq!(err, CoreError::BatchLengthMismatch { points: 2, out: 1 });
    }

    #[test]
    fn batch_rejects_non_finite_input_without_writing() {
        let mut out = [true; 3];
        let points = [Complex::ZERO, Complex::new(f64::NAN, 0.0), Complex::new(1.0, 0.0)];
        let err = map().escapes_batch_into(&points, &mut out).unwrap_err();
        assert_eq!(err, CoreError::NonFiniteSample { index: 1 });
        assert_eq!(out, [true; 3]);
    }

    #[test]
    fn empty_batch_is_fine() {
        assert!(map().escapes_batch(&[]).unwrap().is_empty());
    }

    #[test]
    fn deterministic_results() {
        let points = [
            Complex::new(0.0, 0.0),
            Complex::new(3.2, 0.4),
            Complex::new(-1.3, 0.9),
            Complex::new(2.0, -1.5),
        ];
        let run1 = map().escapes_batch(&points).unwrap();
        let run2 = map().escapes_batch(&points).unwrap();
        assert_eq!(run1, run2);
    }
}
