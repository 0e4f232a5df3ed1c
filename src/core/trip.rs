//! Trips, their stops and activities

use crate::core::budget::BudgetBreakdown;
use crate::core::currency::{is_valid_code, normalize_code, suggest_currency_for_country};
use anyhow::{Result, anyhow, bail};
use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;

fn default_currency() -> String {
    "USD".to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityCategory {
    Sightseeing,
    Food,
    Adventure,
    Culture,
    Shopping,
    Entertainment,
    Relaxation,
    #[default]
    Other,
}

impl Display for ActivityCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                ActivityCategory::Sightseeing => "Sightseeing",
                ActivityCategory::Food => "Food & Dining",
                ActivityCategory::Adventure => "Adventure",
                ActivityCategory::Culture => "Culture",
                ActivityCategory::Shopping => "Shopping",
                ActivityCategory::Entertainment => "Entertainment",
                ActivityCategory::Relaxation => "Relaxation",
                ActivityCategory::Other => "Other",
            }
        )
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Activity {
    pub name: String,
    #[serde(default)]
    pub category: ActivityCategory,
    #[serde(default)]
    pub cost: Decimal,
    pub duration_minutes: Option<u32>,
    pub scheduled_time: Option<NaiveDateTime>,
    pub notes: Option<String>,
}

impl Activity {
    pub fn new(name: &str, cost: Decimal) -> Self {
        Self {
            name: name.to_string(),
            category: ActivityCategory::default(),
            cost,
            duration_minutes: None,
            scheduled_time: None,
            notes: None,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct TripStop {
    #[serde(alias = "city")]
    pub city_name: String,
    pub country: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default)]
    pub order_index: i32,
    pub notes: Option<String>,
    #[serde(default)]
    pub activities: Vec<Activity>,
}

impl TripStop {
    /// Number of days spent at the stop, counting both ends.
    pub fn duration_days(&self) -> i64 {
        (self.end_date - self.start_date).num_days() + 1
    }

    pub fn activity_cost(&self) -> Decimal {
        self.activities.iter().map(|a| a.cost).sum()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TripStatus {
    Upcoming,
    Ongoing,
    Past,
}

impl Display for TripStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                TripStatus::Upcoming => "Upcoming",
                TripStatus::Ongoing => "Ongoing",
                TripStatus::Past => "Past",
            }
        )
    }
}

/// Which trips to include when listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Only(TripStatus),
}

impl StatusFilter {
    pub fn matches(&self, status: TripStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(wanted) => *wanted == status,
        }
    }
}

impl FromStr for StatusFilter {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" => Ok(StatusFilter::All),
            "upcoming" => Ok(StatusFilter::Only(TripStatus::Upcoming)),
            "ongoing" => Ok(StatusFilter::Only(TripStatus::Ongoing)),
            "past" => Ok(StatusFilter::Only(TripStatus::Past)),
            _ => Err(anyhow!("Invalid trip status: {}", s)),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Trip {
    pub title: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub description: Option<String>,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default)]
    pub is_public: bool,
    #[serde(default)]
    pub stops: Vec<TripStop>,
    #[serde(default)]
    budget: BudgetBreakdown,
}

impl Trip {
    pub fn new(title: &str, start_date: NaiveDate, end_date: NaiveDate, currency: &str) -> Self {
        Self {
            title: title.to_string(),
            start_date,
            end_date,
            description: None,
            currency: normalize_code(currency),
            is_public: false,
            stops: Vec::new(),
            budget: BudgetBreakdown::default(),
        }
    }

    /// Checks dates, currency and amounts. Normalizes the currency code.
    pub fn validate(&mut self) -> Result<()> {
        if self.start_date > self.end_date {
            bail!("Trip '{}': end date must be after start date", self.title);
        }
        if !is_valid_code(&self.currency) {
            bail!(
                "Trip '{}': invalid currency code '{}'",
                self.title,
                self.currency
            );
        }
        self.currency = normalize_code(&self.currency);

        for stop in &self.stops {
            if stop.start_date > stop.end_date {
                bail!(
                    "Trip '{}': stop '{}' ends before it starts",
                    self.title,
                    stop.city_name
                );
            }
            let negative = stop.activities.iter().find(|a| a.cost.is_sign_negative());
            if let Some(activity) = negative {
                bail!(
                    "Trip '{}': activity '{}' has a negative cost",
                    self.title,
                    activity.name
                );
            }
        }

        let budget = &self.budget;
        let negative_category = [
            budget.transport,
            budget.lodging,
            budget.meals,
            budget.miscellaneous,
        ]
        .iter()
        .chain(budget.limit.iter())
        .any(|amount| amount.is_sign_negative());
        if negative_category {
            bail!("Trip '{}': budget amounts must not be negative", self.title);
        }
        Ok(())
    }

    /// Number of days of the trip, counting both ends.
    pub fn duration_days(&self) -> i64 {
        (self.end_date - self.start_date).num_days() + 1
    }

    pub fn status(&self, today: NaiveDate) -> TripStatus {
        if self.end_date < today {
            TripStatus::Past
        } else if self.start_date > today {
            TripStatus::Upcoming
        } else {
            TripStatus::Ongoing
        }
    }

    /// Stops in visiting order.
    pub fn ordered_stops(&self) -> Vec<&TripStop> {
        let mut stops: Vec<&TripStop> = self.stops.iter().collect();
        stops.sort_by_key(|stop| (stop.order_index, stop.start_date));
        stops
    }

    /// The budget with its activities category synced to the current stops.
    pub fn budget(&self) -> BudgetBreakdown {
        self.budget.clone().sync_activity_cost(&self.stops)
    }

    /// Replaces the manually entered budget figures.
    pub fn set_budget(&mut self, budget: BudgetBreakdown) {
        self.budget = budget.sync_activity_cost(&self.stops);
    }

    pub fn add_activity(&mut self, stop_index: usize, activity: Activity) -> Result<()> {
        self.stop_mut(stop_index)?.activities.push(activity);
        self.resync_budget();
        Ok(())
    }

    pub fn update_activity_cost(
        &mut self,
        stop_index: usize,
        activity_index: usize,
        cost: Decimal,
    ) -> Result<()> {
        if cost.is_sign_negative() {
            bail!("Activity cost must not be negative: {}", cost);
        }
        let stop = self.stop_mut(stop_index)?;
        let activity = stop
            .activities
            .get_mut(activity_index)
            .ok_or_else(|| anyhow!("No activity at position {}", activity_index))?;
        activity.cost = cost;
        self.resync_budget();
        Ok(())
    }

    pub fn remove_activity(
        &mut self,
        stop_index: usize,
        activity_index: usize,
    ) -> Result<Activity> {
        let stop = self.stop_mut(stop_index)?;
        if activity_index >= stop.activities.len() {
            bail!("No activity at position {}", activity_index);
        }
        let removed = stop.activities.remove(activity_index);
        self.resync_budget();
        Ok(removed)
    }

    /// Currency used in the first stop's country, when it differs from the
    /// trip currency.
    pub fn suggested_currency(&self) -> Option<&'static str> {
        let first = self.ordered_stops().into_iter().next()?;
        suggest_currency_for_country(&first.country).filter(|code| *code != self.currency)
    }

    fn stop_mut(&mut self, stop_index: usize) -> Result<&mut TripStop> {
        self.stops
            .get_mut(stop_index)
            .ok_or_else(|| anyhow!("No stop at position {}", stop_index))
    }

    fn resync_budget(&mut self) {
        self.budget = self.budget.clone().sync_activity_cost(&self.stops);
    }
}
