//! Structural validation of inventory payloads.
//!
//! Deserialization already rejects wrong types and unknown tap statuses;
//! the checks here cover the invariants serde cannot express. Nothing is
//! coerced: every problem becomes a `TaplistError::ContractViolation`
//! carrying the dotted path of the offending field.

use crate::domain::model::{Beer, Price, Tap, TapList};
use crate::utils::error::{Result, TaplistError};
use crate::utils::validation::Validate;
use std::collections::HashMap;

trait ContractCheck {
    fn check(&self, path: &str, out: &mut Vec<TaplistError>);

    fn first_violation(&self) -> Result<()> {
        let mut violations = Vec::new();
        self.check("", &mut violations);
        match violations.into_iter().next() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

fn join(path: &str, field: &str) -> String {
    if path.is_empty() {
        field.to_string()
    } else {
        format!("{}.{}", path, field)
    }
}

fn check_not_blank(path: &str, field: &str, value: &str, out: &mut Vec<TaplistError>) {
    if value.trim().is_empty() {
        out.push(TaplistError::violation(
            join(path, field),
            value,
            "must not be empty",
        ));
    }
}

fn is_hex_color(value: &str) -> bool {
    let digits = value.strip_prefix('#').unwrap_or(value);
    matches!(digits.len(), 3 | 6) && digits.chars().all(|c| c.is_ascii_hexdigit())
}

impl ContractCheck for Price {
    fn check(&self, path: &str, out: &mut Vec<TaplistError>) {
        if self.amount_minor < 0 {
            out.push(TaplistError::violation(
                join(path, "amountMinor"),
                self.amount_minor,
                "amount in minor units must not be negative",
            ));
        }
        check_not_blank(path, "currency", &self.currency, out);
    }
}

impl ContractCheck for Beer {
    fn check(&self, path: &str, out: &mut Vec<TaplistError>) {
        check_not_blank(path, "name", &self.name, out);
        check_not_blank(path, "brewery", &self.brewery, out);

        if let Some(abv) = self.abv {
            if !abv.is_finite() || !(0.0..=100.0).contains(&abv) {
                out.push(TaplistError::violation(
                    join(path, "abv"),
                    abv,
                    "alcohol by volume must be a percentage between 0 and 100",
                ));
            }
        }

        if let Some(color) = &self.color_hex {
            if !is_hex_color(color) {
                out.push(TaplistError::violation(
                    join(path, "colorHex"),
                    color,
                    "expected a #RGB or #RRGGBB hex color",
                ));
            }
        }

        let mut seen: HashMap<i64, usize> = HashMap::new();
        for (idx, price) in self.prices.iter().enumerate() {
            let price_path = join(path, &format!("prices[{}]", idx));
            price.check(&price_path, out);

            if let Some(first) = seen.insert(price.serve_size_id, idx) {
                out.push(TaplistError::violation(
                    join(&price_path, "serveSizeId"),
                    price.serve_size_id,
                    format!("serve size already priced at prices[{}]", first),
                ));
            }
        }
    }
}

impl ContractCheck for Tap {
    fn check(&self, path: &str, out: &mut Vec<TaplistError>) {
        if self.tap_number <= 0 {
            out.push(TaplistError::violation(
                join(path, "tapNumber"),
                self.tap_number,
                "tap number must be a positive integer",
            ));
        }
        if let Some(beer) = &self.beer {
            beer.check(&join(path, "beer"), out);
        }
    }
}

impl ContractCheck for TapList {
    fn check(&self, path: &str, out: &mut Vec<TaplistError>) {
        let mut seen: HashMap<i64, usize> = HashMap::new();
        for (idx, tap) in self.taps.iter().enumerate() {
            let tap_path = join(path, &format!("taps[{}]", idx));
            tap.check(&tap_path, out);

            if let Some(first) = seen.insert(tap.tap_number, idx) {
                out.push(TaplistError::violation(
                    join(&tap_path, "tapNumber"),
                    tap.tap_number,
                    format!("tap number already used by taps[{}]", first),
                ));
            }
        }
    }
}

impl Validate for Price {
    fn validate(&self) -> Result<()> {
        self.first_violation()
    }
}

impl Validate for Beer {
    fn validate(&self) -> Result<()> {
        self.first_violation()
    }
}

impl Validate for Tap {
    fn validate(&self) -> Result<()> {
        self.first_violation()
    }
}

impl Validate for TapList {
    fn validate(&self) -> Result<()> {
        self.first_violation()
    }
}

impl Price {
    pub fn new(serve_size_id: i64, amount_minor: i64, currency: impl Into<String>) -> Result<Self> {
        let price = Self {
            serve_size_id,
            amount_minor,
            currency: currency.into(),
        };
        price.validate()?;
        Ok(price)
    }
}

impl TapList {
    /// Every violation in the list, in document order.
    pub fn audit(&self) -> Vec<TaplistError> {
        let mut violations = Vec::new();
        self.check("", &mut violations);
        violations
    }
}

fn parse<T>(json: &str) -> Result<T>
where
    T: serde::de::DeserializeOwned + Validate,
{
    let value: T = serde_json::from_str(json)?;
    value.validate()?;
    Ok(value)
}

pub fn parse_price(json: &str) -> Result<Price> {
    parse(json)
}

pub fn parse_beer(json: &str) -> Result<Beer> {
    parse(json)
}

pub fn parse_tap(json: &str) -> Result<Tap> {
    parse(json)
}

pub fn parse_tap_list(json: &str) -> Result<TapList> {
    parse(json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::TapStatus;

    fn field_of(err: &TaplistError) -> &str {
        match err {
            TaplistError::ContractViolation { field, .. } => field,
            other => panic!("expected a contract violation, got {:?}", other),
        }
    }

    #[test]
    fn test_price_new_rejects_negative_amount() {
        let err = Price::new(1, -1, "GBP").unwrap_err();
        assert_eq!(field_of(&err), "amountMinor");

        let price = Price::new(1, 0, "GBP").unwrap();
        assert_eq!(price.amount_minor, 0);
    }

    #[test]
    fn test_price_new_rejects_blank_currency() {
        let err = Price::new(1, 650, "  ").unwrap_err();
        assert_eq!(field_of(&err), "currency");
    }

    #[test]
    fn test_hex_color_forms() {
        assert!(is_hex_color("#1a2b3c"));
        assert!(is_hex_color("FFF"));
        assert!(!is_hex_color("#12345"));
        assert!(!is_hex_color("#gggggg"));
        assert!(!is_hex_color(""));
    }

    #[test]
    fn test_empty_tap_is_valid_for_every_status() {
        for status in TapStatus::ALL {
            let tap = Tap { tap_number: 4, status, beer: None };
            assert!(tap.validate().is_ok(), "status {} should allow an empty tap", status);
        }
    }

    #[test]
    fn test_audit_reports_every_violation_with_paths() {
        let json = r#"[
            {"tapNumber": 1, "status": "on", "beer": {
                "id": 1, "name": "", "brewery": "Cloudwater", "style": "IPA",
                "abv": 140.0,
                "prices": [
                    {"serveSizeId": 1, "amountMinor": 650, "currency": "GBP"},
                    {"serveSizeId": 1, "amountMinor": -20, "currency": "GBP"}
                ]
            }},
            {"tapNumber": 1, "status": "off", "beer": null}
        ]"#;
        let list: TapList = serde_json::from_str(json).unwrap();
        let fields: Vec<String> = list.audit().iter().map(|e| field_of(e).to_string()).collect();

        assert_eq!(
            fields,
            vec![
                "taps[0].beer.name",
                "taps[0].beer.abv",
                "taps[0].beer.prices[1].amountMinor",
                "taps[0].beer.prices[1].serveSizeId",
                "taps[1].tapNumber",
            ]
        );
        assert_eq!(field_of(&list.validate().unwrap_err()), "taps[0].beer.name");
    }

    #[test]
    fn test_non_positive_tap_number_rejected() {
        let err = parse_tap(r#"{"tapNumber": 0, "status": "kicked"}"#).unwrap_err();
        assert_eq!(field_of(&err), "tapNumber");
    }
}
