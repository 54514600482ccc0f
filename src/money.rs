//! Money type for variant pricing.
//!
//! Amounts are stored as integer minor units (cents) so prices coming from
//! form fields never transit floating point. [`Money::parse`] is the single
//! entry point for raw text from price inputs.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Supported currencies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Currency {
    /// US Dollar
    USD,
    /// Euro
    EUR,
    /// British Pound
    GBP,
    /// Japanese Yen
    JPY,
    /// Canadian Dollar
    CAD,
    /// Australian Dollar
    AUD,
}

impl Currency {
    /// Get the currency code as a string.
    pub fn code(&self) -> &'static str {
        match self {
            Currency::USD => "USD",
            Currency::EUR => "EUR",
            Currency::GBP => "GBP",
            Currency::JPY => "JPY",
            Currency::CAD => "CAD",
            Currency::AUD => "AUD",
        }
    }

    /// Get the currency symbol.
    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::USD => "$",
            Currency::EUR => "\u{20ac}",
            Currency::GBP => "\u{a3}",
            Currency::JPY => "\u{a5}",
            Currency::CAD => "CA$",
            Currency::AUD => "A$",
        }
    }

    /// Number of decimal places the currency uses.
    pub fn decimal_places(&self) -> u32 {
        match self {
            Currency::JPY => 0,
            _ => 2,
        }
    }

    /// Parse a currency from its code.
    pub fn from_code(code: &str) -> Option<Self> {
        match code.to_uppercase().as_str() {
            "USD" => Some(Currency::USD),
            "EUR" => Some(Currency::EUR),
            "GBP" => Some(Currency::GBP),
            "JPY" => Some(Currency::JPY),
            "CAD" => Some(Currency::CAD),
            "AUD" => Some(Currency::AUD),
            _ => None,
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl Default for Currency {
    fn default() -> Self {
        Currency::USD
    }
}

/// A monetary amount in a specific currency, stored as minor units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Money {
    /// Amount in the smallest currency unit (cents for USD).
    pub amount_cents: i64,
    /// The currency of this amount.
    pub currency: Currency,
}

impl Money {
    /// Create a new money amount from minor units.
    pub fn new(amount_cents: i64, currency: Currency) -> Self {
        Self {
            amount_cents,
            currency,
        }
    }

    /// Zero in the given currency.
    pub fn zero(currency: Currency) -> Self {
        Self::new(0, currency)
    }

    /// Whether the amount is zero.
    pub fn is_zero(&self) -> bool {
        self.amount_cents == 0
    }

    /// Whether the amount is below zero.
    pub fn is_negative(&self) -> bool {
        self.amount_cents < 0
    }

    /// Parse a raw price entry ("19.99", " 12. ", ".50", "-3") into minor
    /// units. Returns `None` when the text is not a plain decimal number,
    /// carries more fraction digits than the currency allows, or overflows.
    ///
    /// Negative amounts parse successfully so callers can distinguish a
    /// malformed entry from a well-formed but disallowed one.
    pub fn parse(input: &str, currency: Currency) -> Option<Self> {
        let text = input.trim();
        let (negative, digits) = match text.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, text),
        };
        if digits.is_empty() {
            return None;
        }

        let (whole, frac) = match digits.split_once('.') {
            Some((w, f)) => (w, f),
            None => (digits, ""),
        };
        if whole.is_empty() && frac.is_empty() {
            return None;
        }
        let places = currency.decimal_places() as usize;
        if frac.len() > places {
            return None;
        }

        let mut cents: i64 = 0;
        for c in whole.chars().chain(frac.chars()) {
            let digit = c.to_digit(10)?;
            cents = cents.checked_mul(10)?.checked_add(i64::from(digit))?;
        }
        for _ in frac.len()..places {
            cents = cents.checked_mul(10)?;
        }

        Some(Self::new(if negative { -cents } else { cents }, currency))
    }

    /// Get the amount as a float of major units. For display math only;
    /// never feed the result back into a price.
    pub fn to_decimal(&self) -> f64 {
        let divisor = 10_f64.powi(self.currency.decimal_places() as i32);
        self.amount_cents as f64 / divisor
    }

    /// Format the bare amount ("19.99") without a currency symbol.
    pub fn display_amount(&self) -> String {
        let places = self.currency.decimal_places();
        if places == 0 {
            return self.amount_cents.to_string();
        }
        let divisor = 10_u64.pow(places);
        let abs = self.amount_cents.unsigned_abs();
        let sign = if self.amount_cents < 0 { "-" } else { "" };
        format!(
            "{}{}.{:0width$}",
            sign,
            abs / divisor,
            abs % divisor,
            width = places as usize
        )
    }

    /// Format with the currency symbol ("$19.99").
    pub fn display(&self) -> String {
        format!("{}{}", self.currency.symbol(), self.display_amount())
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display())
    }
}
