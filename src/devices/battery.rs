use crate::config::BatteryConfig;

/// State-of-charge envelope of a stationary battery.
///
/// `Battery` tracks stored energy between a minimum and maximum state of
/// charge and enforces the power limits of one interval. Efficiency losses
/// are applied on the way in: charging `x` kWh from the grid or the array
/// stores `x × efficiency`, while discharging removes exactly what is
/// delivered.
///
/// Both dispatch simulators drive the same envelope, so the SoC bounds hold
/// identically in every mode.
#[derive(Debug, Clone)]
pub struct Battery {
    /// Nominal capacity in kilowatt-hours.
    pub capacity_kwh: f64,

    /// Stored energy in kilowatt-hours.
    pub soc_kwh: f64,

    /// Lowest allowed stored energy (kWh).
    pub min_kwh: f64,

    /// Highest allowed stored energy (kWh).
    pub max_kwh: f64,

    /// Maximum charge power in kilowatts.
    pub max_charge_kw: f64,

    /// Maximum discharge power in kilowatts.
    pub max_discharge_kw: f64,

    /// Round-trip efficiency (0..=1.0).
    pub efficiency: f64,
}

impl Battery {
    /// Creates an envelope from configuration, starting at the minimum SoC.
    pub fn from_config(config: &BatteryConfig) -> Self {
        let min_kwh = config.min_soc_kwh();
        Self {
            capacity_kwh: config.capacity_kwh,
            soc_kwh: min_kwh,
            min_kwh,
            max_kwh: config.max_soc_kwh().max(min_kwh),
            max_charge_kw: config.charge_rate_kw.max(0.0),
            max_discharge_kw: config.discharge_rate_kw.max(0.0),
            efficiency: config.efficiency().clamp(0.0, 1.0),
        }
    }

    /// Energy (kWh) that could be drawn in to fill the battery to its maximum.
    pub fn headroom_kwh(&self) -> f64 {
        (self.max_kwh - self.soc_kwh).max(0.0)
    }

    /// Energy (kWh) available above the minimum SoC.
    pub fn available_kwh(&self) -> f64 {
        (self.soc_kwh - self.min_kwh).max(0.0)
    }

    /// Stored energy as a percentage of capacity.
    pub fn soc_percent(&self) -> f64 {
        if self.capacity_kwh > 0.0 {
            self.soc_kwh / self.capacity_kwh * 100.0
        } else {
            0.0
        }
    }

    pub fn can_charge(&self) -> bool {
        self.soc_kwh < self.max_kwh
    }

    pub fn can_discharge(&self) -> bool {
        self.soc_kwh > self.min_kwh
    }

    /// Charges up to `requested_kwh` over `hours`, limited by the charge rate and headroom.
    ///
    /// Returns the energy drawn (before efficiency losses).
    pub fn charge(&mut self, requested_kwh: f64, hours: f64) -> f64 {
        let amount = requested_kwh
            .min(self.max_charge_kw * hours)
            .min(self.headroom_kwh())
            .max(0.0);
        self.soc_kwh += amount * self.efficiency;
        self.clamp();
        amount
    }

    /// Discharges up to `requested_kwh` over `hours`, limited by the discharge rate
    /// and the energy above the minimum SoC.
    ///
    /// Returns the energy delivered.
    pub fn discharge(&mut self, requested_kwh: f64, hours: f64) -> f64 {
        let amount = requested_kwh
            .min(self.max_discharge_kw * hours)
            .min(self.available_kwh())
            .max(0.0);
        self.soc_kwh -= amount;
        self.clamp();
        amount
    }

    fn clamp(&mut self) {
        self.soc_kwh = self.soc_kwh.clamp(self.min_kwh, self.max_kwh);
    }
}
