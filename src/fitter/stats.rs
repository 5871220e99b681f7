//! Least-squares regression and the D'Agostino-Pearson normality test, with
//! the few special functions they need for p-values.

use nalgebra::DVector;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearRegression {
    pub slope: f64,
    pub intercept: f64,
    pub r_value: f64,
    /// Two-sided p-value for a null hypothesis of zero slope.
    pub p_value: f64,
    pub std_err: f64,
}

impl LinearRegression {
    pub fn evaluate(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalTest {
    /// K², the sum of the squared skewness and kurtosis z-scores.
    pub statistic: f64,
    pub p_value: f64,
}

/// Smallest sample the normality test accepts.
pub const NORMALTEST_MIN_SAMPLES: usize = 8;

const TINY: f64 = 1.0e-20;

/// Ordinary least squares of `y` on `x`.
///
/// Returns `None` with fewer than three points, mismatched lengths or when
/// every `x` is identical.
pub fn linregress(x: &[f64], y: &[f64]) -> Option<LinearRegression> {
    if x.len() != y.len() || x.len() < 3 {
        return None;
    }

    let n = x.len() as f64;
    let x = DVector::from_column_slice(x);
    let y = DVector::from_column_slice(y);

    let x_mean = x.mean();
    let y_mean = y.mean();
    let dx = x.add_scalar(-x_mean);
    let dy = y.add_scalar(-y_mean);

    let ssxm = dx.norm_squared();
    let ssym = dy.norm_squared();
    let ssxym = dx.dot(&dy);

    if ssxm == 0.0 || !ssxm.is_finite() {
        return None;
    }

    let r_value = if ssym == 0.0 {
        0.0
    } else {
        (ssxym / (ssxm * ssym).sqrt()).clamp(-1.0, 1.0)
    };

    let slope = ssxym / ssxm;
    let intercept = y_mean - slope * x_mean;

    let df = n - 2.0;
    let t = r_value * (df / ((1.0 - r_value + TINY) * (1.0 + r_value + TINY))).sqrt();
    let p_value = students_t_two_sided(t, df);
    let std_err = ((1.0 - r_value * r_value).max(0.0) * ssym / ssxm / df).sqrt();

    Some(LinearRegression {
        slope,
        intercept,
        r_value,
        p_value,
        std_err,
    })
}

/// D'Agostino-Pearson omnibus test.
///
/// Returns `None` below [`NORMALTEST_MIN_SAMPLES`] or for a sample with no
/// spread.
pub fn normaltest(sample: &[f64]) -> Option<NormalTest> {
    if sample.len() < NORMALTEST_MIN_SAMPLES {
        return None;
    }

    let moments = CentralMoments::of(sample)?;
    let n = sample.len() as f64;

    let z_skew = skew_z(moments.skewness(), n);
    let z_kurt = kurtosis_z(moments.kurtosis(), n);
    let statistic = z_skew * z_skew + z_kurt * z_kurt;

    if !statistic.is_finite() {
        return None;
    }

    Some(NormalTest {
        statistic,
        // chi-squared survival function with two degrees of freedom
        p_value: (-statistic / 2.0).exp(),
    })
}

struct CentralMoments {
    m2: f64,
    m3: f64,
    m4: f64,
}

impl CentralMoments {
    fn of(sample: &[f64]) -> Option<Self> {
        let values = DVector::from_column_slice(sample);
        let deviations = values.add_scalar(-values.mean());
        let n = sample.len() as f64;

        let m2 = deviations.iter().map(|d| d.powi(2)).sum::<f64>() / n;
        let m3 = deviations.iter().map(|d| d.powi(3)).sum::<f64>() / n;
        let m4 = deviations.iter().map(|d| d.powi(4)).sum::<f64>() / n;

        if m2 <= 0.0 || !m2.is_finite() {
            return None;
        }

        Some(Self { m2, m3, m4 })
    }

    fn skewness(&self) -> f64 {
        self.m3 / self.m2.powf(1.5)
    }

    /// Pearson kurtosis, 3 for a normal distribution.
    fn kurtosis(&self) -> f64 {
        self.m4 / (self.m2 * self.m2)
    }
}

fn skew_z(skewness: f64, n: f64) -> f64 {
    let y = skewness * (((n + 1.0) * (n + 3.0)) / (6.0 * (n - 2.0))).sqrt();
    let beta2 = (3.0 * (n * n + 27.0 * n - 70.0) * (n + 1.0) * (n + 3.0))
        / ((n - 2.0) * (n + 5.0) * (n + 7.0) * (n + 9.0));
    let w2 = -1.0 + (2.0 * (beta2 - 1.0)).sqrt();
    let delta = 1.0 / (0.5 * w2.ln()).sqrt();
    let alpha = (2.0 / (w2 - 1.0)).sqrt();
    let y = if y == 0.0 { 1.0 } else { y };
    delta * ((y / alpha) + ((y / alpha).powi(2) + 1.0).sqrt()).ln()
}

fn kurtosis_z(kurtosis: f64, n: f64) -> f64 {
    let expected = 3.0 * (n - 1.0) / (n + 1.0);
    let variance =
        24.0 * n * (n - 2.0) * (n - 3.0) / ((n + 1.0) * (n + 1.0) * (n + 3.0) * (n + 5.0));
    let x = (kurtosis - expected) / variance.sqrt();

    let sqrt_beta1 = 6.0 * (n * n - 5.0 * n + 2.0) / ((n + 7.0) * (n + 9.0))
        * ((6.0 * (n + 3.0) * (n + 5.0)) / (n * (n - 2.0) * (n - 3.0))).sqrt();
    let a = 6.0
        + 8.0 / sqrt_beta1 * (2.0 / sqrt_beta1 + (1.0 + 4.0 / (sqrt_beta1 * sqrt_beta1)).sqrt());

    let term1 = 1.0 - 2.0 / (9.0 * a);
    let denom = 1.0 + x * (2.0 / (a - 4.0)).sqrt();
    if denom == 0.0 {
        return f64::NAN;
    }
    let term2 = denom.signum() * ((1.0 - 2.0 / a) / denom.abs()).cbrt();

    (term1 - term2) / (2.0 / (9.0 * a)).sqrt()
}

/// P(|T| >= |t|) for Student's t with `df` degrees of freedom.
pub fn students_t_two_sided(t: f64, df: f64) -> f64 {
    if !t.is_finite() {
        return 0.0;
    }
    let x = df / (df + t * t);
    regularized_incomplete_beta(0.5 * df, 0.5, x).clamp(0.0, 1.0)
}

/// Lanczos approximation (g = 7, n = 9) of ln Γ(x) for x > 0.
pub fn ln_gamma(x: f64) -> f64 {
    const COEFFICIENTS: [f64; 9] = [
        0.999_999_999_999_809_9,
        676.520_368_121_885_1,
        -1_259.139_216_722_402_8,
        771.323_428_777_653_1,
        -176.615_029_162_140_6,
        12.507_343_278_686_905,
        -0.138_571_095_265_720_12,
        9.984_369_578_019_572e-6,
        1.505_632_735_149_311_6e-7,
    ];

    if x < 0.5 {
        // reflection formula
        let pi = std::f64::consts::PI;
        return (pi / (pi * x).sin()).ln() - ln_gamma(1.0 - x);
    }

    let x = x - 1.0;
    let mut sum = COEFFICIENTS[0];
    for (i, &c) in COEFFICIENTS.iter().enumerate().skip(1) {
        sum += c / (x + i as f64);
    }
    let t = x + 7.5;
    0.5 * (2.0 * std::f64::consts::PI).ln() + (x + 0.5) * t.ln() - t + sum.ln()
}

/// Regularized incomplete beta function I_x(a, b).
pub fn regularized_incomplete_beta(a: f64, b: f64, x: f64) -> f64 {
    if x <= 0.0 {
        return 0.0;
    }
    if x >= 1.0 {
        return 1.0;
    }

    let ln_front = ln_gamma(a + b) - ln_gamma(a) - ln_gamma(b) + a * x.ln() + b * (1.0 - x).ln();
    let front = ln_front.exp();

    // the continued fraction converges fast only on this side
    if x < (a + 1.0) / (a + b + 2.0) {
        front * beta_continued_fraction(a, b, x) / a
    } else {
        1.0 - front * beta_continued_fraction(b, a, 1.0 - x) / b
    }
}

/// Modified Lentz evaluation of the incomplete beta continued fraction.
fn beta_continued_fraction(a: f64, b: f64, x: f64) -> f64 {
    const MAX_ITERATIONS: usize = 300;
    const EPSILON: f64 = 3.0e-16;
    const FLOOR: f64 = 1.0e-300;

    let qab = a + b;
    let qap = a + 1.0;
    let qam = a - 1.0;

    let mut c = 1.0;
    let mut d = 1.0 - qab * x / qap;
    if d.abs() < FLOOR {
        d = FLOOR;
    }
    d = 1.0 / d;
    let mut h = d;

    for m in 1..=MAX_ITERATIONS {
        let m = m as f64;
        let m2 = 2.0 * m;

        let aa = m * (b - m) * x / ((qam + m2) * (a + m2));
        d = 1.0 + aa * d;
        if d.abs() < FLOOR {
            d = FLOOR;
        }
        c = 1.0 + aa / c;
        if c.abs() < FLOOR {
            c = FLOOR;
        }
        d = 1.0 / d;
        h *= d * c;

        let aa = -(a + m) * (qab + m) * x / ((a + m2) * (qap + m2));
        d = 1.0 + aa * d;
        if d.abs() < FLOOR {
            d = FLOOR;
        }
        c = 1.0 + aa / c;
        if c.abs() < FLOOR {
            c = FLOOR;
        }
        d = 1.0 / d;
        let delta = d * c;
        h *= delta;

        if (delta - 1.0).abs() < EPSILON {
            break;
        }
    }

    h
}

/// Rounds to `decimals` places on the exact decimal value of `value`, ties
/// to even. Negative zero comes back as zero.
pub fn round_to(value: f64, decimals: usize) -> f64 {
    if !value.is_finite() {
        return value;
    }

    let rounded = format!("{value:.decimals$}")
        .parse::<f64>()
        .unwrap_or(value);

    if rounded == 0.0 { 0.0 } else { rounded }
}
