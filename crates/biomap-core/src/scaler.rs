//! Scaler: maps a numeric metric onto a bounded marker radius.
//!
//! The input domain is clipped to the 5th–95th percentile of the reference
//! values so that a handful of very large plants do not squash every other
//! marker to the minimum size.

/// Lower clipping quantile of the reference distribution.
pub const LOWER_QUANTILE: f64 = 0.05;
/// Upper clipping quantile of the reference distribution.
pub const UPPER_QUANTILE: f64 = 0.95;

/// Linear, clamped mapping from `[v_min, v_max]` to `[r_min, r_max]`.
///
/// Built once per column with [`Scaler::fit`]; cheap to copy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scaler {
    /// `(v_min, v_max)`, always with `v_min < v_max`. `None` when the
    /// reference distribution had no finite values.
    domain: Option<(f64, f64)>,
    r_min: f64,
    r_max: f64,
}

impl Scaler {
    /// Fit a scaler to the finite values among `values`.
    ///
    /// Bounds are the 5th/95th percentiles; if those coincide the full min/max
    /// is used instead, and if that is still degenerate the domain is widened
    /// to `[v, v + 1]`.
    pub fn fit<I>(values: I, r_min: f64, r_max: f64) -> Self
    where
        I: IntoIterator<Item = Option<f64>>,
    {
        let mut finite: Vec<f64> = values.into_iter().flatten().filter(|v| v.is_finite()).collect();
        if finite.is_empty() {
            return Self::constant(r_min, r_max);
        }
        finite.sort_by(f64::total_cmp);

        let (mut v_min, mut v_max) = match (
            percentile(&finite, LOWER_QUANTILE),
            percentile(&finite, UPPER_QUANTILE),
        ) {
            (Some(lo), Some(hi)) => (lo, hi),
            _ => return Self::constant(r_min, r_max),
        };

        if v_max <= v_min {
            v_min = finite[0];
            v_max = finite[finite.len() - 1];
        }
        if v_max <= v_min {
            (v_min, v_max) = widen(v_min);
        }

        tracing::trace!(v_min, v_max, n = finite.len(), "fitted scaler");
        Self {
            domain: Some((v_min, v_max)),
            r_min,
            r_max,
        }
    }

    /// A scaler that sizes everything at the midpoint of `[r_min, r_max]`.
    pub fn constant(r_min: f64, r_max: f64) -> Self {
        Self {
            domain: None,
            r_min,
            r_max,
        }
    }

    pub fn domain(&self) -> Option<(f64, f64)> {
        self.domain
    }

    pub fn midpoint(&self) -> f64 {
        (self.r_min + self.r_max) / 2.0
    }

    /// Radius for one value. Missing and NaN values get the midpoint.
    pub fn scale(&self, value: Option<f64>) -> f64 {
        let (x, (v_min, v_max)) = match (value, self.domain) {
            (Some(x), Some(domain)) if !x.is_nan() => (x, domain),
            _ => return self.midpoint(),
        };
        let clamped = x.clamp(v_min, v_max);
        let span = v_max - v_min;
        let t = if span.is_finite() {
            (clamped - v_min) / span
        } else {
            // Domain wider than f64::MAX; halving every term keeps it finite.
            (clamped * 0.5 - v_min * 0.5) / (v_max * 0.5 - v_min * 0.5)
        };
        if t <= 0.0 {
            self.r_min
        } else if t >= 1.0 {
            self.r_max
        } else {
            self.r_min + t * (self.r_max - self.r_min)
        }
    }
}

/// `[v, v + 1]`, or a few ulps around `v` when it is too large for `+ 1`
/// to change it. Never steps past `f64::MAX`.
fn widen(v: f64) -> (f64, f64) {
    let next = v + 1.0;
    if next > v {
        return (v, next);
    }
    let step = v.abs() * f64::EPSILON * 2.0;
    if (v + step).is_finite() {
        (v, v + step)
    } else {
        (v - step, v)
    }
}

/// Percentile of an ascending slice with linear interpolation between the
/// closest ranks (position `q * (n - 1)`).
pub fn percentile(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() || !(0.0..=1.0).contains(&q) {
        return None;
    }
    let pos = q * (sorted.len() - 1) as f64;
    let lower = pos.floor() as usize;
    let upper = (lower + 1).min(sorted.len() - 1);
    let frac = pos - lower as f64;
    let (lo, hi) = (sorted[lower], sorted[upper]);
    let diff = hi - lo;
    if diff.is_finite() {
        Some(lo + diff * frac)
    } else {
        Some((lo * 0.5 + (hi * 0.5 - lo * 0.5) * frac) * 2.0)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
