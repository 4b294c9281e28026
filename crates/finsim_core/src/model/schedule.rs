//! Recurrence rules

use std::str::FromStr;

use jiff::civil::Date;
use serde::{Deserialize, Serialize};

use crate::error::ConfigurationError;

/// Unit a schedule repeats in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    Once,
    Days,
    Weeks,
    Months,
    Years,
}

impl FromStr for Period {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "once" => Ok(Period::Once),
            "days" => Ok(Period::Days),
            "weeks" => Ok(Period::Weeks),
            "months" => Ok(Period::Months),
            "years" => Ok(Period::Years),
            other => Err(ConfigurationError::UnknownPeriod(other.to_string())),
        }
    }
}

/// When a schedule stops firing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScheduleEnd {
    /// Last day the schedule may fire (inclusive)
    At { at: Date },
    /// Maximum number of firings counted from `start_at`
    AfterOccurrences {
        #[serde(rename = "afterXOccurences")]
        count: u32,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schedule {
    pub start_at: Date,
    pub period: Period,
    /// Interval between firings in `period` units; absent means 1
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub every: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<ScheduleEnd>,
}

impl Schedule {
    pub fn new(start_at: Date, period: Period) -> Self {
        Self {
            start_at,
            period,
            every: None,
            end: None,
        }
    }

    pub fn once(at: Date) -> Self {
        Self::new(at, Period::Once)
    }

    pub fn daily(start_at: Date) -> Self {
        Self::new(start_at, Period::Days)
    }

    pub fn weekly(start_at: Date) -> Self {
        Self::new(start_at, Period::Weeks)
    }

    pub fn monthly(start_at: Date) -> Self {
        Self::new(start_at, Period::Months)
    }

    pub fn yearly(start_at: Date) -> Self {
        Self::new(start_at, Period::Years)
    }

    #[must_use]
    pub fn every(mut self, every: u32) -> Self {
        self.every = Some(every);
        self
    }

    #[must_use]
    pub fn until(mut self, at: Date) -> Self {
        self.end = Some(ScheduleEnd::At { at });
        self
    }

    #[must_use]
    pub fn occurrences(mut self, count: u32) -> Self {
        self.end = Some(ScheduleEnd::AfterOccurrences { count });
        self
    }

    /// The effective interval, rejecting a zero `every`.
    pub fn interval(&self) -> Result<u32, ConfigurationError> {
        match self.every {
            None => Ok(1),
            Some(0) => Err(ConfigurationError::InvalidInterval(0)),
            Some(n) => Ok(n),
        }
    }

    pub fn occurrence_cap(&self) -> Option<u32> {
        match self.end {
            Some(ScheduleEnd::AfterOccurrences { count }) => Some(count),
            _ => None,
        }
    }

    pub fn ends_at(&self) -> Option<Date> {
        match self.end {
            Some(ScheduleEnd::At { at }) => Some(at),
            _ => None,
        }
    }
}
