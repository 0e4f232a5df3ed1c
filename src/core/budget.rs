//! Trip budget aggregation.
//!
//! A [`BudgetBreakdown`] holds five cost categories and a total that is only
//! ever derived from them. The activities category is itself derived from the
//! trip's activity list and is re-synced rather than edited.

use crate::core::exchange::ExchangeRateService;
use crate::core::money::MoneyError;
use crate::core::trip::TripStop;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BudgetCategory {
    Transport,
    Lodging,
    Meals,
    Activities,
    Miscellaneous,
}

impl BudgetCategory {
    pub const ALL: [BudgetCategory; 5] = [
        BudgetCategory::Transport,
        BudgetCategory::Lodging,
        BudgetCategory::Meals,
        BudgetCategory::Activities,
        BudgetCategory::Miscellaneous,
    ];
}

impl Display for BudgetCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                BudgetCategory::Transport => "Transport",
                BudgetCategory::Lodging => "Lodging",
                BudgetCategory::Meals => "Meals",
                BudgetCategory::Activities => "Activities",
                BudgetCategory::Miscellaneous => "Miscellaneous",
            }
        )
    }
}

/// Budget entries as written in the config file. The total is never read
/// from input.
#[derive(Debug, Default, Deserialize)]
struct BudgetEntries {
    #[serde(default)]
    transport: Decimal,
    #[serde(default, alias = "stay")]
    lodging: Decimal,
    #[serde(default)]
    meals: Decimal,
    #[serde(default, alias = "activity")]
    activities: Decimal,
    #[serde(default, alias = "misc")]
    miscellaneous: Decimal,
    #[serde(default, alias = "budget_limit")]
    limit: Option<Decimal>,
}

impl From<BudgetEntries> for BudgetBreakdown {
    fn from(entries: BudgetEntries) -> Self {
        BudgetBreakdown {
            transport: entries.transport,
            lodging: entries.lodging,
            meals: entries.meals,
            activities: entries.activities,
            miscellaneous: entries.miscellaneous,
            total: Decimal::ZERO,
            limit: entries.limit,
        }
        .recompute_total()
    }
}

/// Costs of a trip split by category, in the trip's currency.
///
/// Callers that change a category field must call [`recompute_total`]
/// afterwards; the total is not kept in sync otherwise.
///
/// [`recompute_total`]: BudgetBreakdown::recompute_total
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "BudgetEntries")]
pub struct BudgetBreakdown {
    pub transport: Decimal,
    pub lodging: Decimal,
    pub meals: Decimal,
    pub activities: Decimal,
    pub miscellaneous: Decimal,
    total: Decimal,
    pub limit: Option<Decimal>,
}

impl BudgetBreakdown {
    /// Creates a breakdown from the manually entered categories. Activities
    /// start at zero until synced.
    pub fn new(
        transport: Decimal,
        lodging: Decimal,
        meals: Decimal,
        miscellaneous: Decimal,
    ) -> Self {
        BudgetBreakdown {
            transport,
            lodging,
            meals,
            activities: Decimal::ZERO,
            miscellaneous,
            total: Decimal::ZERO,
            limit: None,
        }
        .recompute_total()
    }

    pub fn with_limit(mut self, limit: Option<Decimal>) -> Self {
        self.limit = limit;
        self
    }

    pub fn total(&self) -> Decimal {
        self.total
    }

    pub fn category(&self, category: BudgetCategory) -> Decimal {
        match category {
            BudgetCategory::Transport => self.transport,
            BudgetCategory::Lodging => self.lodging,
            BudgetCategory::Meals => self.meals,
            BudgetCategory::Activities => self.activities,
            BudgetCategory::Miscellaneous => self.miscellaneous,
        }
    }

    pub fn recompute_total(mut self) -> Self {
        self.total = BudgetCategory::ALL
            .iter()
            .map(|category| self.category(*category))
            .sum();
        self
    }

    /// True only when a limit is set and the total is strictly above it.
    pub fn is_over_budget(&self) -> bool {
        self.limit.is_some_and(|limit| self.total > limit)
    }

    /// Amount left before reaching the limit; negative when over budget.
    pub fn remaining(&self) -> Option<Decimal> {
        self.limit.map(|limit| limit - self.total)
    }

    /// Percentage of the total spent on `category`, or `None` for an empty
    /// budget.
    pub fn share(&self, category: BudgetCategory) -> Option<Decimal> {
        if self.total.is_zero() {
            return None;
        }
        Some((self.category(category) / self.total * Decimal::ONE_HUNDRED).round_dp(1))
    }

    /// Sets the activities category to the summed cost of every activity on
    /// every stop, then recomputes the total.
    pub fn sync_activity_cost(mut self, stops: &[TripStop]) -> Self {
        self.activities = stops
            .iter()
            .flat_map(|stop| stop.activities.iter())
            .map(|activity| activity.cost)
            .sum();
        debug!(activities = %self.activities, "Synced activity cost");
        self.recompute_total()
    }
}

/// Converts the manually entered categories and the limit from `from` to `to`.
///
/// The activities category is derived from the trip's activities and is left
/// as is; re-sync it separately if needed.
pub async fn convert_budget(
    breakdown: &BudgetBreakdown,
    rates: &ExchangeRateService,
    from: &str,
    to: &str,
) -> Result<BudgetBreakdown, MoneyError> {
    let limit = match breakdown.limit {
        Some(limit) => Some(rates.convert(limit, from, to).await?),
        None => None,
    };

    Ok(BudgetBreakdown {
        transport: rates.convert(breakdown.transport, from, to).await?,
        lodging: rates.convert(breakdown.lodging, from, to).await?,
        meals: rates.convert(breakdown.meals, from, to).await?,
        activities: breakdown.activities,
        miscellaneous: rates.convert(breakdown.miscellaneous, from, to).await?,
        total: breakdown.total,
        limit,
    }
    .recompute_total())
}
