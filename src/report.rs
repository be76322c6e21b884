//! Scenario report: tariff costs, simulation outcome and sizing advice.

use std::collections::BTreeMap;
use std::fmt;
use std::io::{self, Write};

use serde::Serialize;

use crate::io::export::{write_battery_timeline, write_combined_timeline, write_solar_timeline};
use crate::series::Statistics;
use crate::sim::types::{
    BatteryAnalysis, BatteryState, CombinedAnalysis, CombinedState, SolarAnalysis, SolarGeneration,
};
use crate::sim::{BatteryRecommendation, SolarRecommendation};
use crate::tariff::{PeriodCost, Tariff};

/// Cost of the consumption series under the scenario's tariff, before any system.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CostSummary {
    pub total_cost: f64,
    /// Energy cost annualized plus a year of standing charges.
    pub annual_cost: f64,
    pub average_cost_per_kwh: f64,
    pub breakdown: BTreeMap<String, PeriodCost>,
}

/// Which simulator ran, with its analysis.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Simulation {
    /// No battery or solar configured.
    TariffOnly,
    Battery(BatteryAnalysis),
    Solar(SolarAnalysis),
    Combined(CombinedAnalysis),
}

/// One simulated interval, whichever simulator produced it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SimulatedStep {
    Battery(BatteryState),
    Solar(SolarGeneration),
    Combined(CombinedState),
}

impl Simulation {
    /// Short name of the simulated system.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::TariffOnly => "tariff only",
            Self::Battery(_) => "battery",
            Self::Solar(_) => "solar",
            Self::Combined(_) => "solar + battery",
        }
    }

    pub fn annual_savings(&self) -> f64 {
        match self {
            Self::TariffOnly => 0.0,
            Self::Battery(a) => a.annual_savings,
            Self::Solar(a) => a.annual_savings,
            Self::Combined(a) => a.annual_savings,
        }
    }

    /// Simulated state of interval `index`, if any.
    pub fn step(&self, index: usize) -> Option<SimulatedStep> {
        match self {
            Self::TariffOnly => None,
            Self::Battery(a) => a.timeline.get(index).cloned().map(SimulatedStep::Battery),
            Self::Solar(a) => a.timeline.get(index).cloned().map(SimulatedStep::Solar),
            Self::Combined(a) => a.timeline.get(index).cloned().map(SimulatedStep::Combined),
        }
    }

    /// Writes the simulated timeline as CSV.
    ///
    /// Returns `Ok(false)` without writing when nothing was simulated.
    ///
    /// # Errors
    ///
    /// Returns an `io::Error` if writing fails.
    pub fn write_timeline(&self, writer: impl Write) -> io::Result<bool> {
        match self {
            Self::TariffOnly => return Ok(false),
            Self::Battery(a) => write_battery_timeline(&a.timeline, writer)?,
            Self::Solar(a) => write_solar_timeline(&a.timeline, writer)?,
            Self::Combined(a) => write_combined_timeline(&a.timeline, writer)?,
        }
        Ok(true)
    }
}

/// Everything a scenario run produces.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScenarioReport {
    pub tariff: Tariff,
    /// Per-interval consumption statistics; `None` for an empty series.
    pub statistics: Option<Statistics>,
    pub cost: CostSummary,
    pub simulation: Simulation,
    pub battery_recommendation: Option<BatteryRecommendation>,
    pub solar_recommendation: Option<SolarRecommendation>,
}

fn years(payback: f64) -> String {
    if payback.is_finite() {
        format!("{payback:.1} years")
    } else {
        "never".to_string()
    }
}

fn write_savings(
    f: &mut fmt::Formatter<'_>,
    total: f64,
    annual: f64,
    payback: f64,
    system_cost: f64,
) -> fmt::Result {
    writeln!(f, "Savings:               {total:.2} ({annual:.2} per year)")?;
    writeln!(f, "Payback:               {} on {system_cost:.0}", years(payback))
}

impl fmt::Display for ScenarioReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Scenario Report ---")?;
        writeln!(f, "Tariff:                {} ({})", self.tariff.name, self.tariff.id)?;
        if let Some(s) = &self.statistics {
            writeln!(
                f,
                "Consumption:           {:.2} kWh over {} intervals",
                s.total, s.count
            )?;
            writeln!(
                f,
                "Per interval:          mean {:.3}, median {:.3}, peak {:.3} kWh",
                s.mean, s.median, s.max
            )?;
        } else {
            writeln!(f, "Consumption:           no data")?;
        }
        writeln!(f, "Energy cost:           {:.2}", self.cost.total_cost)?;
        writeln!(f, "Annual cost:           {:.2}", self.cost.annual_cost)?;
        writeln!(
            f,
            "Average price:         {:.4} per kWh",
            self.cost.average_cost_per_kwh
        )?;
        for (id, pc) in &self.cost.breakdown {
            writeln!(f, "  {id:<20} {:>10.2} kWh {:>10.2}", pc.consumption, pc.cost)?;
        }

        writeln!(f, "System:                {}", self.simulation.kind())?;
        match &self.simulation {
            Simulation::TariffOnly => {}
            Simulation::Battery(a) => {
                write_savings(
                    f,
                    a.total_savings,
                    a.annual_savings,
                    a.payback_years,
                    a.system_cost,
                )?;
                writeln!(
                    f,
                    "Battery throughput:    {:.2} kWh in, {:.2} kWh out ({:.1} cycles)",
                    a.total_charged_kwh, a.total_discharged_kwh, a.equivalent_full_cycles
                )?;
                writeln!(f, "Load covered:          {:.1}%", a.self_consumption_rate * 100.0)?;
                writeln!(f, "Peak shaving:          {:.2} kWh", a.peak_shaving_kwh)?;
                if let Some(day) = &a.worst_day {
                    writeln!(
                        f,
                        "Worst day:             {} ({:.1}% covered)",
                        day.date,
                        day.coverage * 100.0
                    )?;
                }
            }
            Simulation::Solar(a) => {
                writeln!(
                    f,
                    "Generation:            {:.2} kWh ({:.0} kWh per year, scale {:.3})",
                    a.total_generation, a.annual_generation, a.scaling_factor
                )?;
                write_savings(
                    f,
                    a.total_savings,
                    a.annual_savings,
                    a.payback_years,
                    a.system_cost,
                )?;
                writeln!(f, "Self-consumption:      {:.1}%", a.self_consumption_rate * 100.0)?;
                writeln!(f, "Self-sufficiency:      {:.1}%", a.self_sufficiency_rate * 100.0)?;
            }
            Simulation::Combined(a) => {
                writeln!(
                    f,
                    "Generation:            {:.2} kWh (scale {:.3})",
                    a.total_generation, a.scaling_factor
                )?;
                writeln!(
                    f,
                    "Battery:               {:.2} kWh solar, {:.2} kWh grid, {:.2} kWh out",
                    a.total_solar_charged, a.total_grid_charged, a.total_discharged
                )?;
                write_savings(
                    f,
                    a.total_savings,
                    a.annual_savings,
                    a.payback_years,
                    a.system_cost,
                )?;
                writeln!(f, "Self-sufficiency:      {:.1}%", a.self_sufficiency_rate * 100.0)?;
            }
        }
        if let Some(r) = &self.battery_recommendation {
            writeln!(
                f,
                "Suggested battery:     {:.1} kWh at {:.1} kW ({:.2} per year)",
                r.capacity_kwh, r.charge_rate_kw, r.estimated_annual_savings
            )?;
        }
        if let Some(r) = &self.solar_recommendation {
            write!(
                f,
                "Suggested solar:       {:.1} kWp, {} panels (~{:.0} kWh per year)",
                r.capacity_kwp, r.panel_count, r.expected_annual_generation
            )?;
        }
        Ok(())
    }
}
