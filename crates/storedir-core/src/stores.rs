//! Store records returned by `GET /stores` and their display helpers.
//!
//! ## Observed record shape
//!
//! ### `status`
//! Wire values are WordPress post states: `publish` (active), `draft`
//! (coming soon) and `trash` (discontinued). Anything else deserializes as
//! [`StoreStatus::Unknown`] instead of failing the whole page.
//!
//! ### `cashback_amount`
//! Sometimes a JSON number (`12.5`), sometimes a numeric string (`"12.50"`),
//! occasionally `null` or missing. Unparseable values are treated as absent.
//!
//! ### `cashback_enabled`, `is_promoted`, `is_sharable`
//! Booleans, `0`/`1` integers or `"0"`/`"1"` strings depending on the
//! record's age; `null` means off. A null `name` reads as empty.
//!
//! ### `amount_type`
//! `fixed` or `percent`. Other values are kept as
//! [`AmountType::Unrecognized`] so the card can say the data is invalid
//! rather than hiding the field.

use std::fmt;
use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Deserializer, Serialize};

use crate::UnknownVariant;

pub type StoreId = i64;

pub const NO_CASHBACK_LABEL: &str = "No cashback available";
pub const INVALID_CASHBACK_LABEL: &str = "Invalid cashback data";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StoreStatus {
    #[serde(rename = "publish")]
    Active,
    #[serde(rename = "draft")]
    ComingSoon,
    #[serde(rename = "trash")]
    Discontinued,
    #[serde(other)]
    Unknown,
}

impl StoreStatus {
    /// Statuses a user can filter on, in dropdown order.
    pub const SELECTABLE: [StoreStatus; 3] = [
        StoreStatus::Active,
        StoreStatus::ComingSoon,
        StoreStatus::Discontinued,
    ];

    /// Value used in the URL and sent to the backend.
    #[must_use]
    pub fn as_wire(self) -> &'static str {
        match self {
            StoreStatus::Active => "publish",
            StoreStatus::ComingSoon => "draft",
            StoreStatus::Discontinued => "trash",
            StoreStatus::Unknown => "unknown",
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            StoreStatus::Active => "Active",
            StoreStatus::ComingSoon => "Coming Soon",
            StoreStatus::Discontinued => "Discontinued",
            StoreStatus::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for StoreStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Accepts the wire values (`publish`, `draft`, `trash`) and the friendly
/// names (`active`, `coming-soon`, `discontinued`), case-insensitively.
impl FromStr for StoreStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "publish" | "active" => Ok(StoreStatus::Active),
            "draft" | "coming-soon" | "coming_soon" => Ok(StoreStatus::ComingSoon),
            "trash" | "discontinued" => Ok(StoreStatus::Discontinued),
            _ => Err(UnknownVariant {
                kind: "store status",
                value: s.to_owned(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AmountType {
    Fixed,
    Percent,
    #[serde(other)]
    Unrecognized,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Store {
    pub id: StoreId,
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(default)]
    pub logo: Option<String>,
    #[serde(default)]
    pub homepage: Option<String>,
    #[serde(default = "default_status", deserialize_with = "lenient_status")]
    pub status: StoreStatus,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub cashback_enabled: bool,
    #[serde(default)]
    pub rate_type: Option<String>,
    #[serde(default)]
    pub amount_type: Option<AmountType>,
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub cashback_amount: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub is_promoted: bool,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub is_sharable: bool,
}

fn default_status() -> StoreStatus {
    StoreStatus::Unknown
}

impl Store {
    /// Text for the cashback badge on a store card.
    ///
    /// Amounts are rounded half away from zero to two decimal places. The
    /// rate type ("upto", "flat", ...) prefixes the amount when present.
    #[must_use]
    pub fn cashback_label(&self) -> String {
        if !self.cashback_enabled {
            return NO_CASHBACK_LABEL.to_owned();
        }

        let mut amount = self
            .cashback_amount
            .unwrap_or_default()
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        amount.rescale(2);

        let value = match self.amount_type {
            Some(AmountType::Fixed) => format!("${amount} Cashback"),
            Some(AmountType::Percent) => format!("{amount}% Cashback"),
            Some(AmountType::Unrecognized) | None => INVALID_CASHBACK_LABEL.to_owned(),
        };

        match self.rate_type.as_deref().map(str::trim) {
            Some(rate) if !rate.is_empty() => format!("{rate} {value}"),
            _ => value,
        }
    }
}

fn lenient_decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match raw {
        Some(serde_json::Value::Number(n)) => parse_decimal(&n.to_string()),
        Some(serde_json::Value::String(s)) => parse_decimal(s.trim()),
        _ => None,
    })
}

/// Truthiness of a flag column: `true`, non-zero numbers and `"1"`/`"true"`
/// are on; `false`, `0`, `"0"`, `null` and anything else are off.
fn lenient_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match raw {
        Some(serde_json::Value::Bool(b)) => b,
        Some(serde_json::Value::Number(n)) => n.as_f64().is_some_and(|v| v.abs() > f64::EPSILON),
        Some(serde_json::Value::String(s)) => {
            matches!(s.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes")
        }
        _ => false,
    })
}

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match raw {
        Some(serde_json::Value::String(s)) => s,
        Some(serde_json::Value::Number(n)) => n.to_string(),
        _ => String::new(),
    })
}

fn lenient_status<'de, D>(deserializer: D) -> Result<StoreStatus, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match raw {
        Some(value @ serde_json::Value::String(_)) => {
            serde_json::from_value(value).unwrap_or(StoreStatus::Unknown)
        }
        _ => StoreStatus::Unknown,
    })
}

fn parse_decimal(raw: &str) -> Option<Decimal> {
    Decimal::from_str(raw)
        .or_else(|_| Decimal::from_scientific(raw))
        .ok()
}
