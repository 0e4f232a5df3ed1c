pub mod disk;
pub mod memory;

use crate::core::cache::Cache;
use crate::core::config::AppConfig;
use crate::core::currency::ExchangeRateTable;
use disk::DiskCache;
use memory::MemoryCache;
use std::sync::Arc;
use tracing::debug;

const RATES_PARTITION: &str = "exchange_rates";

/// Opens the cache used for exchange rate tables.
///
/// Uses the on-disk cache under the data directory when persistence is
/// enabled, and falls back to an in-memory cache if that cannot be opened.
pub fn open_rate_cache(config: &AppConfig) -> Arc<dyn Cache<String, ExchangeRateTable>> {
    if config.cache.persist {
        let disk = config.default_data_path().and_then(|path| {
            DiskCache::<String, ExchangeRateTable>::open(&path.join("cache"), RATES_PARTITION)
        });
        match disk {
            Ok(cache) => return Arc::new(cache),
            Err(e) => debug!("Could not open disk cache, using memory: {}", e),
        }
    }
    Arc::new(MemoryCache::<String, ExchangeRateTable>::new())
}
