use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::errors::DomainError;
use crate::storage::{KeyValueStore, StorageError};

/// Storage key holding the shopper's display currency code.
pub const CURRENCY_PREFERENCE_KEY: &str = "preferred-currency";

/// Display currencies. Catalog prices are always stored in USD.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    Usd,
    #[default]
    Inr,
    Eur,
    Gbp,
    Aud,
}

impl Currency {
    pub const ALL: [Currency; 5] =
        [Currency::Usd, Currency::Inr, Currency::Eur, Currency::Gbp, Currency::Aud];

    pub fn code(&self) -> &'static str {
        match self {
            Self::Usd => "USD",
            Self::Inr => "INR",
            Self::Eur => "EUR",
            Self::Gbp => "GBP",
            Self::Aud => "AUD",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Usd => "$",
            Self::Inr => "₹",
            Self::Eur => "€",
            Self::Gbp => "£",
            Self::Aud => "A$",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Currency {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let wanted = value.trim();
        Self::ALL
            .into_iter()
            .find(|currency| currency.code().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| DomainError::UnsupportedCurrency(wanted.to_string()))
    }
}

/// Conversion factors from USD, keyed by currency code.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExchangeRates {
    rates: HashMap<String, Decimal>,
}

#[derive(Deserialize)]
struct ProviderPayload {
    rates: HashMap<String, Decimal>,
}

impl ExchangeRates {
    /// Table in effect before the provider has answered: USD only.
    pub fn base_only() -> Self {
        Self { rates: HashMap::from([("USD".to_string(), Decimal::ONE)]) }
    }

    /// Fixed table used when the provider is unreachable or answers garbage.
    pub fn fallback() -> Self {
        let rates = [
            ("USD", Decimal::ONE),
            ("INR", Decimal::new(8312, 2)),
            ("EUR", Decimal::new(92, 2)),
            ("GBP", Decimal::new(79, 2)),
            ("AUD", Decimal::new(152, 2)),
        ]
        .into_iter()
        .map(|(code, rate)| (code.to_string(), rate))
        .collect();
        Self { rates }
    }

    /// Parses a provider response of the form `{"base": "USD", "rates": {...}}`.
    pub fn from_provider_json(raw: &str) -> Result<Self, serde_json::Error> {
        let payload: ProviderPayload = serde_json::from_str(raw)?;
        Ok(Self { rates: payload.rates })
    }

    pub fn from_provider_json_or_fallback(raw: &str) -> Self {
        match Self::from_provider_json(raw) {
            Ok(rates) => rates,
            Err(error) => {
                warn!(
                    event_name = "currency.rates.fallback_used",
                    error = %error,
                    "exchange rate payload unreadable; using fallback rates"
                );
                Self::fallback()
            }
        }
    }

    pub fn rate(&self, currency: Currency) -> Option<Decimal> {
        self.rates.get(currency.code()).copied()
    }

    /// Converts a USD price. A currency without a known rate converts 1:1.
    pub fn convert(&self, price_usd: Decimal, currency: Currency) -> Decimal {
        price_usd * self.rate(currency).unwrap_or(Decimal::ONE)
    }

    /// Display string for a USD price in `currency`.
    ///
    /// Rupees are rounded to whole units and grouped the Indian way
    /// (`₹1,23,457`); every other currency shows two decimals.
    pub fn format_price(&self, price_usd: Decimal, currency: Currency) -> String {
        let converted = self.convert(price_usd, currency);
        match currency {
            Currency::Inr => {
                let rounded =
                    converted.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
                format!("{}{}", currency.symbol(), group_indian(&rounded.trunc().to_string()))
            }
            _ => {
                let rounded =
                    converted.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
                format!("{}{:.2}", currency.symbol(), rounded)
            }
        }
    }
}

impl Default for ExchangeRates {
    fn default() -> Self {
        Self::base_only()
    }
}

/// Inserts separators after the last three digits and then every two.
fn group_indian(digits: &str) -> String {
    let (sign, digits) = match digits.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", digits),
    };
    if digits.len() <= 3 {
        return format!("{sign}{digits}");
    }

    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut groups: Vec<&str> = Vec::new();
    let mut end = head.len();
    while end > 0 {
        let start = end.saturating_sub(2);
        groups.push(&head[start..end]);
        end = start;
    }
    groups.reverse();

    format!("{sign}{},{tail}", groups.join(","))
}

/// Reads the stored display currency, falling back to `default` when nothing
/// usable is stored.
pub fn load_preference<S>(store: &S, default: Currency) -> Result<Currency, StorageError>
where
    S: KeyValueStore + ?Sized,
{
    let Some(raw) = store.get(CURRENCY_PREFERENCE_KEY)? else {
        return Ok(default);
    };

    match raw.parse() {
        Ok(currency) => Ok(currency),
        Err(error) => {
            warn!(
                event_name = "currency.preference.ignored",
                error = %error,
                "stored currency preference is not supported"
            );
            Ok(default)
        }
    }
}

pub fn save_preference<S>(store: &mut S, currency: Currency) -> Result<(), StorageError>
where
    S: KeyValueStore + ?Sized,
{
    store.set(CURRENCY_PREFERENCE_KEY, currency.code().to_string())
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::{group_indian, load_preference, save_preference, Currency, ExchangeRates};
    use crate::storage::{KeyValueStore, MemoryStore};

    #[test]
    fn indian_grouping_uses_two_digit_groups_above_thousands() {
        assert_eq!(group_indian("999"), "999");
        assert_eq!(group_indian("1000"), "1,000");
        assert_eq!(group_indian("123456"), "1,23,456");
        assert_eq!(group_indian("1234567"), "12,34,567");
        assert_eq!(group_indian("-24935"), "-24,935");
    }

    #[test]
    fn rupee_prices_round_to_whole_units() {
        let rates = ExchangeRates::fallback();
        // 299.99 * 83.12 = 24935.1688
        assert_eq!(rates.format_price(Decimal::new(29_999, 2), Currency::Inr), "₹24,935");
        // 1500 * 83.12 = 124680
        assert_eq!(rates.format_price(Decimal::new(1_500, 0), Currency::Inr), "₹1,24,680");
    }

    #[test]
    fn other_currencies_show_two_decimals() {
        let rates = ExchangeRates::fallback();
        assert_eq!(rates.format_price(Decimal::new(30, 0), Currency::Eur), "€27.60");
        assert_eq!(rates.format_price(Decimal::new(100, 0), Currency::Aud), "A$152.00");
        assert_eq!(rates.format_price(Decimal::new(5_000, 2), Currency::Usd), "$50.00");
    }

    #[test]
    fn missing_rate_converts_one_to_one() {
        let rates = ExchangeRates::base_only();
        assert_eq!(rates.convert(Decimal::new(42, 0), Currency::Gbp), Decimal::new(42, 0));
        assert_eq!(rates.format_price(Decimal::new(42, 0), Currency::Gbp), "£42.00");
    }

    #[test]
    fn provider_payload_is_parsed() {
        let rates = ExchangeRates::from_provider_json(
            r#"{"base": "USD", "date": "2024-03-01",
                "rates": {"USD": 1, "EUR": 0.9, "JPY": 150.2}}"#,
        )
        .expect("payload should parse");

        assert_eq!(rates.rate(Currency::Eur), Some(Decimal::new(9, 1)));
        assert_eq!(rates.rate(Currency::Inr), None);
    }

    #[test]
    fn unreadable_payload_uses_fallback_table() {
        let rates = ExchangeRates::from_provider_json_or_fallback("<html>rate limited</html>");
        assert_eq!(rates, ExchangeRates::fallback());
    }

    #[test]
    fn preference_round_trips_and_defaults() {
        let mut store = MemoryStore::default();
        let loaded = load_preference(&store, Currency::Inr).expect("memory store reads");
        assert_eq!(loaded, Currency::Inr);

        save_preference(&mut store, Currency::Gbp).expect("memory store accepts writes");
        let loaded = load_preference(&store, Currency::Inr).expect("memory store reads");
        assert_eq!(loaded, Currency::Gbp);

        store.set("preferred-currency", "XYZ".to_string()).expect("memory store accepts writes");
        let loaded = load_preference(&store, Currency::Usd).expect("memory store reads");
        assert_eq!(loaded, Currency::Usd);
    }

    #[test]
    fn currency_codes_parse_case_insensitively() {
        assert_eq!("eur".parse::<Currency>(), Ok(Currency::Eur));
        assert!("btc".parse::<Currency>().is_err());
        assert_eq!(Currency::default(), Currency::Inr);
    }
}
