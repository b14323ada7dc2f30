pub struct StatsHelper;

/// Least-squares line `y = slope * x + intercept`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineFit {
    pub slope: f64,
    pub intercept: f64,
}

impl LineFit {
    pub fn at(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}

impl StatsHelper {
    pub fn mean(samples: &[f64]) -> f64 {
        if samples.is_empty() {
            return 0.0;
        }
        samples.iter().sum::<f64>() / samples.len() as f64
    }

    /// Population standard deviation.
    pub fn std_dev(samples: &[f64]) -> f64 {
        if samples.is_empty() {
            return 0.0;
        }
        let mean = Self::mean(samples);
        let var = samples.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>()
            / samples.len() as f64;
        var.sqrt()
    }

    pub fn rms(samples: &[f64]) -> f64 {
        if samples.is_empty() {
            return 0.0;
        }
        let sum_sq: f64 = samples.iter().map(|&v| v * v).sum();
        (sum_sq / samples.len() as f64).sqrt()
    }

    /// Trailing moving average; the first `window - 1` values average what is available.
    pub fn moving_average(samples: &[f64], window: usize) -> Vec<f64> {
        let window = window.max(1);
        let mut out = Vec::with_capacity(samples.len());
        let mut acc = 0.0;
        for (idx, &value) in samples.iter().enumerate() {
            acc += value;
            if idx >= window {
                acc -= samples[idx - window];
            }
            let count = (idx + 1).min(window);
            out.push(acc / count as f64);
        }
        out
    }

    /// Returns `None` with fewer than two points or when all `x` coincide.
    pub fn linear_fit(x: &[f64], y: &[f64]) -> Option<LineFit> {
        let n = x.len().min(y.len());
        if n < 2 {
            return None;
        }
        let mean_x = Self::mean(&x[..n]);
        let mean_y = Self::mean(&y[..n]);
        let mut sxx = 0.0;
        let mut sxy = 0.0;
        for (&xi, &yi) in x[..n].iter().zip(&y[..n]) {
            sxx += (xi - mean_x) * (xi - mean_x);
            sxy += (xi - mean_x) * (yi - mean_y);
        }
        if sxx == 0.0 {
            return None;
        }
        let slope = sxy / sxx;
        Some(LineFit {
            slope,
            intercept: mean_y - slope * mean_x,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rms_zero_sequence_yields_zero() {
        assert_eq!(StatsHelper::rms(&[]), 0.0);
        assert_eq!(StatsHelper::rms(&[0.0, 0.0]), 0.0);
    }

    #[test]
    fn rms_handles_single_value() {
        assert_eq!(StatsHelper::rms(&[4.0]), 4.0);
    }

    #[test]
    fn std_dev_of_constant_is_zero() {
        assert_eq!(StatsHelper::std_dev(&[3.0, 3.0, 3.0]), 0.0);
        assert_eq!(StatsHelper::std_dev(&[1.0, 3.0]), 1.0);
    }

    #[test]
    fn moving_average_smooths_step() {
        let smoothed = StatsHelper::moving_average(&[0.0, 0.0, 4.0, 4.0], 2);
        assert_eq!(smoothed, vec![0.0, 0.0, 2.0, 4.0]);
    }

    #[test]
    fn linear_fit_recovers_line() {
        let x = [0.0, 1.0, 2.0, 3.0];
        let y: Vec<f64> = x.iter().map(|v| 0.5 * v + 2.0).collect();
        let fit = StatsHelper::linear_fit(&x, &y).unwrap();
        assert!((fit.slope - 0.5).abs() < 1e-12);
        assert!((fit.intercept - 2.0).abs() < 1e-12);
        assert!((fit.at(4.0) - 4.0).abs() < 1e-12);
    }

    #[test]
    fn linear_fit_rejects_degenerate_input() {
        assert!(StatsHelper::linear_fit(&[1.0], &[1.0]).is_none());
        assert!(StatsHelper::linear_fit(&[1.0, 1.0], &[0.0, 2.0]).is_none());
    }
}
