use serde::{Deserialize, Serialize};

use super::schedule::Schedule;
use crate::interest::FULL_RATE;

/// When interest is computed and when it reaches the principal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum InterestSchedule {
    /// Accrue into a pending account on `calc` days, capitalise on `apply` days
    Split { calc: Schedule, apply: Schedule },
    /// Compute and capitalise on the same days
    Single(Schedule),
}

/// Interest rule attached to an account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Interest {
    /// Percent scaled by the simulation's interest precision (5000 = 5% at 1000)
    pub rate: i64,
    pub schedule: InterestSchedule,
    /// Name of the registered calculator; absent means "full"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub apply_rate: Option<String>,
}

impl Interest {
    pub fn new(rate: i64, schedule: Schedule) -> Self {
        Self {
            rate,
            schedule: InterestSchedule::Single(schedule),
            apply_rate: None,
        }
    }

    pub fn split(rate: i64, calc: Schedule, apply: Schedule) -> Self {
        Self {
            rate,
            schedule: InterestSchedule::Split { calc, apply },
            apply_rate: None,
        }
    }

    #[must_use]
    pub fn with_calculator(mut self, name: impl Into<String>) -> Self {
        self.apply_rate = Some(name.into());
        self
    }

    pub fn calculator_name(&self) -> &str {
        self.apply_rate.as_deref().unwrap_or(FULL_RATE)
    }

    pub fn schedules(&self) -> Vec<&Schedule> {
        match &self.schedule {
            InterestSchedule::Single(s) => vec![s],
            InterestSchedule::Split { calc, apply } => vec![calc, apply],
        }
    }
}
