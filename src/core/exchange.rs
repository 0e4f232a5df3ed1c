//! Exchange rate lookup and currency conversion

use crate::core::cache::Cache;
use crate::core::currency::{ExchangeRateTable, normalize_code};
use crate::core::money::{MoneyError, round_cents};
use anyhow::Result;
use async_trait::async_trait;
use rust_decimal::Decimal;
use std::fmt::Display;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Cache key the rate table is stored under.
pub const RATES_CACHE_KEY: &str = "exchange_rates";

/// How long a fetched rate table stays fresh.
pub const DEFAULT_RATES_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// A remote source of exchange rates quoted against USD.
#[async_trait]
pub trait RateSource: Send + Sync {
    async fn fetch_rates(&self) -> Result<ExchangeRateTable>;
}

/// Where a rate table returned by [`ExchangeRateService`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RatesOrigin {
    Cache,
    Live,
    Fallback,
}

impl Display for RatesOrigin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                RatesOrigin::Cache => "cached",
                RatesOrigin::Live => "live",
                RatesOrigin::Fallback => "fallback",
            }
        )
    }
}

/// Resolves exchange rates from the cache, then the remote source, then the
/// bundled fallback table, and converts amounts with them.
#[derive(Clone)]
pub struct ExchangeRateService {
    source: Arc<dyn RateSource>,
    cache: Arc<dyn Cache<String, ExchangeRateTable>>,
    ttl: Duration,
}

impl ExchangeRateService {
    pub fn new(
        source: Arc<dyn RateSource>,
        cache: Arc<dyn Cache<String, ExchangeRateTable>>,
    ) -> Self {
        Self {
            source,
            cache,
            ttl: DEFAULT_RATES_TTL,
        }
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Returns the current rate table. Never fails.
    pub async fn get_rates(&self) -> ExchangeRateTable {
        self.get_rates_with_origin().await.0
    }

    pub async fn get_rates_with_origin(&self) -> (ExchangeRateTable, RatesOrigin) {
        let key = RATES_CACHE_KEY.to_string();
        if let Some(cached) = self.cache.get(&key).await {
            return (cached, RatesOrigin::Cache);
        }

        match self.source.fetch_rates().await {
            Ok(table) => {
                debug!(currencies = table.len(), "Fetched live exchange rates");
                self.cache.put(key, table.clone(), Some(self.ttl)).await;
                (table, RatesOrigin::Live)
            }
            Err(e) => {
                // The fallback is not cached so the next call retries the source.
                warn!(error = %e, "Exchange rate fetch failed, using fallback rates");
                (ExchangeRateTable::fallback(), RatesOrigin::Fallback)
            }
        }
    }

    /// Drops the cached table so the next lookup goes to the source.
    pub async fn invalidate(&self) {
        self.cache.remove(&RATES_CACHE_KEY.to_string()).await;
    }

    pub async fn convert(
        &self,
        amount: Decimal,
        from: &str,
        to: &str,
    ) -> Result<Decimal, MoneyError> {
        if normalize_code(from) == normalize_code(to) {
            return Ok(amount);
        }
        let rates = self.get_rates().await;
        convert_with_table(&rates, amount, from, to)
    }
}

/// Converts `amount` through the base currency using `rates`, rounded to
/// cents with banker's rounding.
///
/// Codes missing from the table are treated as having a rate of one. This
/// yields a wrong figure for unsupported currencies rather than an error.
pub fn convert_with_table(
    rates: &ExchangeRateTable,
    amount: Decimal,
    from: &str,
    to: &str,
) -> Result<Decimal, MoneyError> {
    let from = normalize_code(from);
    let to = normalize_code(to);
    if from == to {
        return Ok(amount);
    }

    let from_rate = lookup_rate(rates, &from);
    let to_rate = lookup_rate(rates, &to);

    let overflow = || MoneyError::Overflow {
        amount,
        from: from.clone(),
        to: to.clone(),
    };
    let converted = amount
        .checked_div(from_rate)
        .and_then(|in_base| in_base.checked_mul(to_rate))
        .ok_or_else(overflow)?;

    Ok(round_cents(converted))
}

fn lookup_rate(rates: &ExchangeRateTable, code: &str) -> Decimal {
    rates.rate(code).unwrap_or_else(|| {
        debug!(currency = code, "No exchange rate for currency, assuming 1.0");
        Decimal::ONE
    })
}
