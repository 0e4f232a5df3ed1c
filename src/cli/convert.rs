use crate::core::currency::is_valid_code;
use crate::core::exchange::ExchangeRateService;
use crate::core::money::MonetaryAmount;
use anyhow::{Result, bail};

pub async fn run(service: &ExchangeRateService, amount: &str, from: &str, to: &str) -> Result<()> {
    let converted = convert(service, amount, from, to).await?;
    println!("{}", describe_conversion(&converted.0, &converted.1));
    Ok(())
}

/// Parses `amount` in `from` and converts it to `to`.
pub async fn convert(
    service: &ExchangeRateService,
    amount: &str,
    from: &str,
    to: &str,
) -> Result<(MonetaryAmount, MonetaryAmount)> {
    for code in [from, to] {
        if !is_valid_code(code) {
            bail!("Invalid currency code '{}'", code);
        }
    }

    let original = MonetaryAmount::parse(amount, from)?;
    let converted_amount = service
        .convert(original.amount, &original.currency, to)
        .await?;
    let converted = MonetaryAmount::new(converted_amount, to)?;
    Ok((original, converted))
}

pub fn describe_conversion(from: &MonetaryAmount, to: &MonetaryAmount) -> String {
    format!("{from} ({}) = {to} ({})", from.currency, to.currency)
}
