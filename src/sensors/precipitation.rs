/// Rain rate and rolling accumulation totals
use std::fmt;

use log::info;
use time::OffsetDateTime;

use super::{ChannelModel, Observation};
use crate::models::{Category, UnitSystem};
use crate::units::mm_to_inches;
use crate::utils::{format_datetime, local_now, round_to};

const PRECISION: u32 = 2;

/// Accumulation period tracked by its own counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    Hourly,
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl Period {
    pub fn from_channel(channel_id: &str) -> Option<Period> {
        match channel_id {
            "hourly" => Some(Period::Hourly),
            "daily" => Some(Period::Daily),
            "weekly" => Some(Period::Weekly),
            "monthly" => Some(Period::Monthly),
            "yearly" => Some(Period::Yearly),
            _ => None,
        }
    }

    /// Identifies the period `now` falls in. Two instants share a marker
    /// exactly when they belong to the same period.
    pub fn marker(self, now: OffsetDateTime) -> i64 {
        match self {
            Period::Hourly => i64::from(now.to_julian_day()) * 24 + i64::from(now.hour()),
            Period::Daily => i64::from(now.to_julian_day()),
            Period::Weekly => {
                let (year, week, _) = now.to_iso_week_date();
                i64::from(year) * 100 + i64::from(week)
            }
            Period::Monthly => i64::from(now.year()) * 12 + i64::from(u8::from(now.month())),
            Period::Yearly => i64::from(now.year()),
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Period::Hourly => "hourly",
            Period::Daily => "daily",
            Period::Weekly => "weekly",
            Period::Monthly => "monthly",
            Period::Yearly => "yearly",
        })
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct Counter {
    total: f64,
    marker: Option<i64>,
}

/// Independent running totals, one per period. A total resets lazily, when
/// the first sample of a new period arrives.
#[derive(Debug, Clone, Default)]
pub struct AccumulationCounters {
    counters: [Counter; 5],
}

impl AccumulationCounters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `amount` to the running total for `period`
    ///
    /// # Arguments
    /// * `period` - Which counter to update
    /// * `amount` - Rain amount in millimetres
    /// * `now` - Time of the sample, used to detect period boundaries
    ///
    /// # Returns
    /// The running total after adding `amount`
    pub fn accumulate(&mut self, period: Period, amount: f64, now: OffsetDateTime) -> f64 {
        let marker = period.marker(now);
        let counter = &mut self.counters[period.index()];

        if counter.marker != Some(marker) {
            if counter.marker.is_some() {
                info!(
                    "New {} rain period at {}, previous total {:.2} mm",
                    period,
                    format_datetime(&now),
                    counter.total
                );
            }
            counter.marker = Some(marker);
            counter.total = 0.0;
        }

        counter.total += amount;
        counter.total
    }

    pub fn total(&self, period: Period) -> f64 {
        self.counters[period.index()].total
    }
}

pub struct PrecipitationModel {
    counters: AccumulationCounters,
    clock: fn() -> OffsetDateTime,
}

impl PrecipitationModel {
    /// Model reading period boundaries from `clock` instead of the wall clock.
    pub fn with_clock(clock: fn() -> OffsetDateTime) -> Self {
        Self {
            counters: AccumulationCounters::new(),
            clock,
        }
    }

    pub fn counters(&self) -> &AccumulationCounters {
        &self.counters
    }
}

impl Default for PrecipitationModel {
    fn default() -> Self {
        Self::with_clock(local_now)
    }
}

impl ChannelModel for PrecipitationModel {
    fn category(&self) -> Category {
        Category::Precipitation
    }

    fn convert(&mut self, channel_id: &str, raw: f64, _obs: &Observation, units: UnitSystem) -> f64 {
        let millimetres = match Period::from_channel(channel_id) {
            Some(period) => self.counters.accumulate(period, raw, (self.clock)()),
            None => raw,
        };

        let value = match units {
            UnitSystem::Us => mm_to_inches(millimetres),
            UnitSystem::Metric | UnitSystem::Uk => millimetres,
        };
        round_to(value, PRECISION)
    }
}
