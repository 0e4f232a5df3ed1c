//! Currency catalog, exchange rate tables and display helpers

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Currency all table rates are quoted against.
pub const BASE_CURRENCY: &str = "USD";

/// Supported currencies with their display names.
pub const CURRENCIES: &[(&str, &str)] = &[
    ("USD", "US Dollar"),
    ("EUR", "Euro"),
    ("GBP", "British Pound"),
    ("JPY", "Japanese Yen"),
    ("CNY", "Chinese Yuan"),
    ("INR", "Indian Rupee"),
    ("CAD", "Canadian Dollar"),
    ("AUD", "Australian Dollar"),
    ("CHF", "Swiss Franc"),
    ("MXN", "Mexican Peso"),
    ("BRL", "Brazilian Real"),
    ("ZAR", "South African Rand"),
    ("SGD", "Singapore Dollar"),
    ("HKD", "Hong Kong Dollar"),
    ("NZD", "New Zealand Dollar"),
    ("SEK", "Swedish Krona"),
    ("NOK", "Norwegian Krone"),
    ("KRW", "South Korean Won"),
    ("TRY", "Turkish Lira"),
    ("RUB", "Russian Ruble"),
    ("AED", "UAE Dirham"),
    ("THB", "Thai Baht"),
    ("PLN", "Polish Zloty"),
    ("DKK", "Danish Krone"),
];

// Units of each currency per USD, used when no live table is available.
const FALLBACK_RATES: &[(&str, Decimal)] = &[
    ("USD", dec!(1.0)),
    ("EUR", dec!(0.92)),
    ("GBP", dec!(0.79)),
    ("JPY", dec!(149.50)),
    ("CNY", dec!(7.24)),
    ("INR", dec!(83.12)),
    ("CAD", dec!(1.35)),
    ("AUD", dec!(1.52)),
    ("CHF", dec!(0.88)),
    ("MXN", dec!(17.15)),
    ("BRL", dec!(4.98)),
    ("ZAR", dec!(18.75)),
    ("SGD", dec!(1.34)),
    ("HKD", dec!(7.82)),
    ("NZD", dec!(1.64)),
    ("SEK", dec!(10.45)),
    ("NOK", dec!(10.68)),
    ("KRW", dec!(1320.50)),
    ("TRY", dec!(32.15)),
    ("RUB", dec!(92.50)),
    ("AED", dec!(3.67)),
    ("THB", dec!(35.80)),
    ("PLN", dec!(4.02)),
    ("DKK", dec!(6.87)),
];

/// Trims and uppercases a currency code.
pub fn normalize_code(code: &str) -> String {
    code.trim().to_ascii_uppercase()
}

/// Returns true for three ASCII letters, in any case.
pub fn is_valid_code(code: &str) -> bool {
    let code = code.trim();
    code.len() == 3 && code.chars().all(|c| c.is_ascii_alphabetic())
}

pub fn currency_name(code: &str) -> Option<&'static str> {
    let code = normalize_code(code);
    CURRENCIES
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, name)| *name)
}

/// Display glyph for a currency. Unknown codes are returned unchanged.
pub fn symbol_for(code: &str) -> &str {
    match code {
        "USD" | "CAD" | "AUD" | "MXN" | "SGD" | "HKD" | "NZD" => "$",
        "EUR" => "€",
        "GBP" => "£",
        "JPY" | "CNY" => "¥",
        "INR" => "₹",
        "CHF" => "Fr",
        "BRL" => "R$",
        "ZAR" => "R",
        "SEK" | "NOK" | "DKK" => "kr",
        "KRW" => "₩",
        "TRY" => "₺",
        "RUB" => "₽",
        "AED" => "د.إ",
        "THB" => "฿",
        "PLN" => "zł",
        other => other,
    }
}

/// Formats an amount as `<symbol><amount>` with two decimals and `,` grouping,
/// e.g. `$1,234.50`.
pub fn format_amount(amount: Decimal, code: &str) -> String {
    let code = normalize_code(code);
    let rounded = amount.round_dp(2);
    let text = format!("{:.2}", rounded.abs());
    let (whole, cents) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    format!("{}{sign}{grouped}.{cents}", symbol_for(&code))
}

/// Currency commonly used in a country, matched case-insensitively on the
/// country name.
pub fn suggest_currency_for_country(country: &str) -> Option<&'static str> {
    let code = match country.trim().to_lowercase().as_str() {
        "united states" | "united states of america" | "usa" | "us" => "USD",
        "france" | "germany" | "italy" | "spain" | "netherlands" | "portugal" | "greece"
        | "austria" | "belgium" | "ireland" | "finland" | "croatia" | "luxembourg"
        | "slovakia" | "slovenia" | "estonia" | "latvia" | "lithuania" | "malta" | "cyprus" => {
            "EUR"
        }
        "united kingdom" | "uk" | "england" | "scotland" | "wales" | "great britain" => "GBP",
        "japan" => "JPY",
        "china" => "CNY",
        "india" => "INR",
        "canada" => "CAD",
        "australia" => "AUD",
        "switzerland" => "CHF",
        "mexico" => "MXN",
        "brazil" => "BRL",
        "south africa" => "ZAR",
        "singapore" => "SGD",
        "hong kong" => "HKD",
        "new zealand" => "NZD",
        "sweden" => "SEK",
        "norway" => "NOK",
        "south korea" | "korea" => "KRW",
        "turkey" | "türkiye" | "turkiye" => "TRY",
        "russia" => "RUB",
        "united arab emirates" | "uae" => "AED",
        "thailand" => "THB",
        "poland" => "PLN",
        "denmark" => "DKK",
        _ => return None,
    };
    Some(code)
}

/// Rates of each currency relative to [`BASE_CURRENCY`].
///
/// The base currency always has a rate of exactly one and every rate is
/// strictly positive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExchangeRateTable {
    rates: BTreeMap<String, Decimal>,
}

impl ExchangeRateTable {
    pub fn new<I, S>(rates: I) -> Self
    where
        I: IntoIterator<Item = (S, Decimal)>,
        S: AsRef<str>,
    {
        let mut table: BTreeMap<String, Decimal> = rates
            .into_iter()
            .filter(|(_, rate)| *rate > Decimal::ZERO)
            .map(|(code, rate)| (normalize_code(code.as_ref()), rate))
            .collect();
        table.insert(BASE_CURRENCY.to_string(), Decimal::ONE);
        Self { rates: table }
    }

    /// The static table bundled with the application.
    pub fn fallback() -> Self {
        Self::new(FALLBACK_RATES.iter().copied())
    }

    pub fn rate(&self, code: &str) -> Option<Decimal> {
        self.rates.get(&normalize_code(code)).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Decimal)> {
        self.rates.iter().map(|(code, rate)| (code.as_str(), *rate))
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol_lookup() {
        assert_eq!(symbol_for("USD"), "$");
        assert_eq!(symbol_for("EUR"), "€");
        assert_eq!(symbol_for("BRL"), "R$");
        assert_eq!(symbol_for("ZZZ"), "ZZZ");
    }

    #[test]
    fn test_format_amount_groups_thousands() {
        assert_eq!(format_amount(dec!(1234567.891), "USD"), "$1,234,567.89");
        assert_eq!(format_amount(dec!(999), "EUR"), "€999.00");
        assert_eq!(format_amount(dec!(1000), "inr"), "₹1,000.00");
        assert_eq!(format_amount(Decimal::ZERO, "GBP"), "£0.00");
        assert_eq!(format_amount(dec!(12.5), "XYZ"), "XYZ12.50");
    }

    #[test]
    fn test_format_amount_negative() {
        assert_eq!(format_amount(dec!(-1234.5), "USD"), "$-1,234.50");
    }

    #[test]
    fn test_fallback_table_invariants() {
        let table = ExchangeRateTable::fallback();
        assert_eq!(table.len(), CURRENCIES.len());
        assert_eq!(table.rate("USD"), Some(Decimal::ONE));
        assert_eq!(table.rate("eur"), Some(dec!(0.92)));
        assert!(table.iter().all(|(_, rate)| rate > Decimal::ZERO));
        for (code, _) in CURRENCIES {
            assert!(table.rate(code).is_some(), "missing fallback for {code}");
        }
    }

    #[test]
    fn test_table_drops_non_positive_and_pins_base() {
        let table = ExchangeRateTable::new([
            ("usd", dec!(2)),
            ("eur", dec!(0.9)),
            ("BAD", Decimal::ZERO),
            ("NEG", dec!(-1)),
        ]);
        assert_eq!(table.rate("USD"), Some(Decimal::ONE));
        assert_eq!(table.rate("EUR"), Some(dec!(0.9)));
        assert!(table.rate("BAD").is_none());
        assert!(table.rate("NEG").is_none());
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_country_suggestion() {
        assert_eq!(suggest_currency_for_country("France"), Some("EUR"));
        assert_eq!(suggest_currency_for_country(" japan "), Some("JPY"));
        assert_eq!(suggest_currency_for_country("United Kingdom"), Some("GBP"));
        assert_eq!(suggest_currency_for_country("Atlantis"), None);
    }

    #[test]
    fn test_code_helpers() {
        assert_eq!(normalize_code(" eur "), "EUR");
        assert!(is_valid_code("usd"));
        assert!(!is_valid_code("US"));
        assert!(!is_valid_code("U5D"));
        assert_eq!(currency_name("chf"), Some("Swiss Franc"));
        assert_eq!(currency_name("ZZZ"), None);
    }
}
