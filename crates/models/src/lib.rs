use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

// Settings models
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Settings {
	#[serde(default = "default_database_dir")]
	pub database_dir: PathBuf,
	#[serde(default = "default_remainder_collection")]
	pub remainder_collection: String,
	#[serde(default = "default_turnover_collection")]
	pub turnover_collection: String,
	#[serde(default)]
	pub log_filter: Option<String>,
}

impl Default for Settings {
	fn default() -> Self {
		Self {
			database_dir: default_database_dir(),
			remainder_collection: default_remainder_collection(),
			turnover_collection: default_turnover_collection(),
			log_filter: None,
		}
	}
}

impl Settings {
	/// Collection name the given report family is written to.
	pub fn collection_for(&self, family: ReportFamily) -> &str {
		match family {
			ReportFamily::Remainder => &self.remainder_collection,
			ReportFamily::Turnover => &self.turnover_collection,
		}
	}
}

fn default_database_dir() -> PathBuf {
	PathBuf::from("database")
}

fn default_remainder_collection() -> String {
	ReportFamily::Remainder.default_collection().to_string()
}

fn default_turnover_collection() -> String {
	ReportFamily::Turnover.default_collection().to_string()
}

// Ledger classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
pub enum AccountCode {
	Account21,
	Account101,
	Account105,
}

impl AccountCode {
	pub const ALL: [AccountCode; 3] = [
		AccountCode::Account21,
		AccountCode::Account101,
		AccountCode::Account105,
	];

	pub fn as_u16(self) -> u16 {
		match self {
			AccountCode::Account21 => 21,
			AccountCode::Account101 => 101,
			AccountCode::Account105 => 105,
		}
	}

	/// Substring that introduces a subgroup header row, e.g. "21."
	pub fn marker(self) -> String {
		format!("{}.", self.as_u16())
	}
}

impl From<AccountCode> for u16 {
	fn from(code: AccountCode) -> Self {
		code.as_u16()
	}
}

impl TryFrom<u16> for AccountCode {
	type Error = String;

	fn try_from(value: u16) -> Result<Self, Self::Error> {
		match value {
			21 => Ok(AccountCode::Account21),
			101 => Ok(AccountCode::Account101),
			105 => Ok(AccountCode::Account105),
			other => Err(format!("unknown account code {}", other)),
		}
	}
}

impl fmt::Display for AccountCode {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.as_u16())
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportFamily {
	Remainder,
	Turnover,
}

impl ReportFamily {
	pub fn default_collection(self) -> &'static str {
		match self {
			ReportFamily::Remainder => "remainders",
			ReportFamily::Turnover => "turnovers",
		}
	}
}

impl fmt::Display for ReportFamily {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			ReportFamily::Remainder => f.write_str("remainder"),
			ReportFamily::Turnover => f.write_str("turnover"),
		}
	}
}

// Output records
/// Remaining quantity as the source report states it.
///
/// Accounts 21/101 carry a plain number, account 105 keeps the decimal rendering
/// of the cell (`"42.0"`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Quantity {
	Count(f64),
	Decimal(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemainderRecord {
	pub product_name: String,
	pub full_name: String,
	pub quantity_remaining: Quantity,
	pub subgroup: String,
	pub report_date: String,
	pub account_code: AccountCode,
}

/// Parses a `YYYY-MM-DD` report date.
pub fn parse_report_date(raw: &str) -> Option<NaiveDate> {
	NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}

impl RemainderRecord {
	pub fn report_day(&self) -> Option<NaiveDate> {
		parse_report_date(&self.report_date)
	}
}

/// Unit price and unit count for one period column.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
	pub price: f64,
	pub quantity: f64,
}

impl PricePoint {
	/// Builds a point from a raw aggregate price cell and its unit count.
	///
	/// The report stores price × quantity, so the unit price is `raw_price / count`.
	/// A NaN count leaves the raw price untouched; a NaN price stays NaN.
	pub fn from_aggregate(raw_price: f64, count: f64) -> Self {
		let price = if count.is_nan() {
			raw_price
		} else {
			raw_price / count
		};
		Self {
			price,
			quantity: count,
		}
	}
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnoverRecord {
	pub product_name: String,
	pub account_code: AccountCode,
	pub subgroup: Option<String>,
	pub quarter: Option<String>,
	pub year: Option<String>,
	pub unit: String,
	pub before_period: PricePoint,
	pub debit_movement: PricePoint,
	pub credit_movement: PricePoint,
	pub after_period: PricePoint,
}

/// Generic "piece" unit used where the report has no unit column.
pub const PIECE_UNIT: &str = "шт.";

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;

	#[test]
	fn test_unit_price_divides_by_count() {
		let point = PricePoint::from_aggregate(100.0, 4.0);
		assert_eq!(point.price, 25.0);
		assert_eq!(point.quantity, 4.0);
	}

	#[test]
	fn test_unit_price_keeps_raw_price_without_count() {
		let point = PricePoint::from_aggregate(100.0, f64::NAN);
		assert_eq!(point.price, 100.0);
		assert!(point.quantity.is_nan());

		let point = PricePoint::from_aggregate(f64::NAN, 3.0);
		assert!(point.price.is_nan());
	}

	#[test]
	fn test_account_code_serializes_as_number() {
		let value = serde_json::to_value(AccountCode::Account105).unwrap();
		assert_eq!(value, json!(105));

		let code: AccountCode = serde_json::from_value(json!(21)).unwrap();
		assert_eq!(code, AccountCode::Account21);
		assert!(serde_json::from_value::<AccountCode>(json!(22)).is_err());
	}

	#[test]
	fn test_remainder_record_field_names() {
		let record = RemainderRecord {
			product_name: "bolt".to_string(),
			full_name: "Bolt, pcs".to_string(),
			quantity_remaining: Quantity::Decimal("42.0".to_string()),
			subgroup: "12".to_string(),
			report_date: "2024-06-07".to_string(),
			account_code: AccountCode::Account105,
		};
		let value = serde_json::to_value(&record).unwrap();
		assert_eq!(value["quantity_remaining"], json!("42.0"));
		assert_eq!(value["account_code"], json!(105));
		assert_eq!(
			record.report_day(),
			NaiveDate::from_ymd_opt(2024, 6, 7)
		);
	}

	#[test]
	fn test_settings_defaults_fill_missing_fields() {
		let settings: Settings = serde_json::from_value(json!({ "database_dir": "db" })).unwrap();
		assert_eq!(settings.database_dir, PathBuf::from("db"));
		assert_eq!(settings.collection_for(ReportFamily::Remainder), "remainders");
		assert_eq!(settings.collection_for(ReportFamily::Turnover), "turnovers");
		assert!(settings.log_filter.is_none());
	}
}
