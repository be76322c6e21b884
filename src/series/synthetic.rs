use chrono::{Datelike, NaiveDate, TimeDelta};
use rand::{Rng, SeedableRng, rngs::StdRng};

use super::interval::ConsumptionInterval;
use crate::config::ProfileConfig;

/// Length of a generated interval in minutes.
const INTERVAL_MINUTES: i64 = 30;
const INTERVALS_PER_DAY: i64 = 24 * 60 / INTERVAL_MINUTES;

/// A generator of synthetic household consumption.
///
/// `ProfileGenerator` produces half-hourly readings following a sinusoidal
/// daily pattern with configurable baseline, amplitude, phase, seasonal
/// swing and random noise. Output is reproducible for a given seed.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use tariff_sim::series::synthetic::ProfileGenerator;
///
/// let mut generator = ProfileGenerator::new(
///     0.4,  // base_kw - average draw
///     0.3,  // amp_kw - daily variation
///     1.2,  // phase_rad - evening peak
///     0.05, // noise_std - small random variation
///     0.2,  // seasonal_amplitude - 20% more in winter
///     42,   // seed
/// );
/// let series = generator.generate(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(), 7);
/// assert_eq!(series.len(), 7 * 48);
/// ```
#[derive(Debug, Clone)]
pub struct ProfileGenerator {
    /// Baseline power draw in kilowatts.
    pub base_kw: f64,

    /// Amplitude of the daily sinusoid in kilowatts.
    pub amp_kw: f64,

    /// Phase offset of the daily sinusoid in radians.
    pub phase_rad: f64,

    /// Standard deviation of the Gaussian noise in kilowatts.
    pub noise_std: f64,

    /// Relative baseline increase at midwinter (0.2 = +20 %).
    pub seasonal_amplitude: f64,

    rng: StdRng,
}

impl ProfileGenerator {
    /// Creates a new generator.
    ///
    /// # Arguments
    ///
    /// * `base_kw` - Baseline power draw in kilowatts
    /// * `amp_kw` - Amplitude of the daily variation in kilowatts
    /// * `phase_rad` - Phase offset in radians (0 = rising through the baseline at midnight)
    /// * `noise_std` - Standard deviation of Gaussian noise in kilowatts
    /// * `seasonal_amplitude` - Relative baseline increase at midwinter
    /// * `seed` - Random seed for reproducible noise
    pub fn new(
        base_kw: f64,
        amp_kw: f64,
        phase_rad: f64,
        noise_std: f64,
        seasonal_amplitude: f64,
        seed: u64,
    ) -> Self {
        Self {
            base_kw: base_kw.max(0.0),
            amp_kw,
            phase_rad,
            noise_std: noise_std.max(0.0),
            seasonal_amplitude,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Creates a generator from a `[profile]` scenario section.
    pub fn from_config(config: &ProfileConfig) -> Self {
        Self::new(
            config.base_kw,
            config.amp_kw,
            config.phase_rad,
            config.noise_std,
            config.seasonal_amplitude,
            config.seed,
        )
    }

    /// Generates `days` of contiguous half-hourly readings starting at midnight of `start`.
    pub fn generate(&mut self, start: NaiveDate, days: usize) -> Vec<ConsumptionInterval> {
        let Some(t0) = start.and_hms_opt(0, 0, 0) else {
            return Vec::new();
        };
        let total = days as i64 * INTERVALS_PER_DAY;
        let mut series = Vec::with_capacity(total.max(0) as usize);
        let hours = INTERVAL_MINUTES as f64 / 60.0;

        for step in 0..total {
            let begin = t0 + TimeDelta::minutes(step * INTERVAL_MINUTES);
            let day_pos = (step % INTERVALS_PER_DAY) as f64 / INTERVALS_PER_DAY as f64;
            let kw = self.power_kw(day_pos, begin.ordinal());
            series.push(ConsumptionInterval::new(
                kw * hours,
                begin,
                begin + TimeDelta::minutes(INTERVAL_MINUTES),
            ));
        }
        series
    }

    /// Power draw at a position in the day `[0, 1)` on a given day of the year.
    fn power_kw(&mut self, day_pos: f64, ordinal: u32) -> f64 {
        use std::f64::consts::PI;

        // Peaks in mid-January, troughs in mid-July.
        let season = (2.0 * PI * (f64::from(ordinal) - 15.0) / 365.0).cos();
        let base = self.base_kw * (1.0 + self.seasonal_amplitude * season);
        let daily = self.amp_kw * (2.0 * PI * day_pos + self.phase_rad).sin();
        let kw = base + daily + gaussian_noise(&mut self.rng, self.noise_std);
        kw.max(0.0)
    }
}

/// Gaussian noise via the Box-Muller transform.
///
/// Returns 0 for a non-positive standard deviation.
pub fn gaussian_noise(rng: &mut StdRng, std_dev: f64) -> f64 {
    if std_dev <= 0.0 {
        return 0.0;
    }

    let u1: f64 = rng.random::<f64>().clamp(1e-9, 1.0);
    let u2: f64 = rng.random::<f64>();
    let z0 = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
    z0 * std_dev
}
