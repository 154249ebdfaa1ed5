//! Merge stage of the refresh pipeline.
//!
//! Combines one [`RawCountry`] with the exchange-rate table into a
//! normalized [`MergedCountry`] ready for upsert.
//!
//! Currency rules:
//! - no currency entries: code and rate are null, GDP is `0`
//! - first entry only; any further currencies are ignored
//! - first entry without a code: validation error for the whole batch
//! - code without a matching rate: rate and GDP are null
//! - matching rate of `0`: rate is stored, GDP is null

use serde::Serialize;

use crate::country::{RateTable, RawCountry};
use crate::error::CoreError;
use crate::gdp::{estimate_gdp, GdpMultiplier};

/// A country ready to be written to the store.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MergedCountry {
    pub name: String,
    pub capital: Option<String>,
    pub region: Option<String>,
    pub population: i64,
    pub currency_code: Option<String>,
    pub exchange_rate: Option<f64>,
    pub estimated_gdp: Option<f64>,
    pub flag_url: Option<String>,
}

/// Result of merging a whole country list.
#[derive(Debug, Clone, Default)]
pub struct MergeOutcome {
    pub records: Vec<MergedCountry>,
    /// Raw entries dropped for lacking a name or population.
    pub skipped: usize,
}

/// Merge a single raw country.
///
/// Returns `Ok(None)` when the entry has no usable name or no population.
pub fn merge_country(
    raw: &RawCountry,
    rates: &RateTable,
    multiplier: &mut dyn GdpMultiplier,
) -> Result<Option<MergedCountry>, CoreError> {
    let name = match raw.name.as_deref().map(str::trim) {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => return Ok(None),
    };
    let Some(population) = raw.population else {
        return Ok(None);
    };
    if population < 0 {
        return Err(CoreError::validation(
            "population",
            format!("must be greater than or equal to 0 (country '{name}')"),
        ));
    }

    let currency_code = first_currency_code(raw, &name)?;

    let (exchange_rate, estimated_gdp) = match currency_code.as_deref() {
        None => (None, Some(0.0)),
        Some(code) => match rates.get(code) {
            None => (None, None),
            Some(&rate) => {
                let gdp = if rate > 0.0 {
                    estimate_gdp(population, rate, multiplier.next_multiplier())
                } else {
                    None
                };
                (Some(rate), gdp)
            }
        },
    };

    Ok(Some(MergedCountry {
        name,
        capital: raw.capital.clone(),
        region: raw.region.clone(),
        population,
        currency_code,
        exchange_rate,
        estimated_gdp,
        flag_url: raw.flag.clone(),
    }))
}

/// Merge a whole country list.
///
/// Validation is all-or-nothing: the first invalid entry fails the batch.
pub fn merge_all(
    raws: &[RawCountry],
    rates: &RateTable,
    multiplier: &mut dyn GdpMultiplier,
) -> Result<MergeOutcome, CoreError> {
    let mut outcome = MergeOutcome {
        records: Vec::with_capacity(raws.len()),
        skipped: 0,
    };

    for raw in raws {
        match merge_country(raw, rates, multiplier)? {
            Some(record) => outcome.records.push(record),
            None => outcome.skipped += 1,
        }
    }

    Ok(outcome)
}

/// Code of the first currency entry, or `None` when there are no entries.
fn first_currency_code(raw: &RawCountry, name: &str) -> Result<Option<String>, CoreError> {
    let Some(first) = raw.currencies.as_deref().and_then(<[_]>::first) else {
        return Ok(None);
    };

    match first.code.as_deref().map(str::trim) {
        Some(code) if !code.is_empty() => Ok(Some(code.to_string())),
        _ => Err(CoreError::validation(
            "currency_code",
            format!("is required (country '{name}')"),
        )),
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use crate::country::RawCurrency;
    use crate::gdp::{FixedMultiplier, RandomMultiplier};

    fn currency(code: &str) -> RawCurrency {
        RawCurrency {
            code: Some(code.to_string()),
            ..Default::default()
        }
    }

    fn country(name: &str, population: i64, codes: &[&str]) -> RawCountry {
        RawCountry {
            name: Some(name.to_string()),
            capital: Some(format!("{name} City")),
            region: Some("Europe".to_string()),
            population: Some(population),
            flag: Some(format!("https://flagcdn.com/{}.svg", name.to_lowercase())),
            currencies: Some(codes.iter().map(|c| currency(c)).collect()),
        }
    }

    fn rates(pairs: &[(&str, f64)]) -> RateTable {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn empty_currency_list_yields_zero_gdp() {
        let raw = country("Antarctica", 1000, &[]);
        let merged = merge_country(&raw, &rates(&[("USD", 1.0)]), &mut FixedMultiplier(1500.0))
            .unwrap()
            .unwrap();

        assert_eq!(merged.currency_code, None);
        assert_eq!(merged.exchange_rate, None);
        assert_eq!(merged.estimated_gdp, Some(0.0));
    }

    #[test]
    fn absent_currency_list_yields_zero_gdp() {
        let mut raw = country("Antarctica", 1000, &[]);
        raw.currencies = None;
        let merged = merge_country(&raw, &RateTable::new(), &mut FixedMultiplier(1500.0))
            .unwrap()
            .unwrap();

        assert_eq!(merged.currency_code, None);
        assert_eq!(merged.estimated_gdp, Some(0.0));
    }

    #[test]
    fn unknown_rate_yields_null_gdp() {
        let raw = country("Someland", 1_000_000, &["XYZ"]);
        let merged = merge_country(&raw, &rates(&[("USD", 1.0)]), &mut FixedMultiplier(1500.0))
            .unwrap()
            .unwrap();

        assert_eq!(merged.currency_code.as_deref(), Some("XYZ"));
        assert_eq!(merged.exchange_rate, None);
        assert_eq!(merged.estimated_gdp, None);
    }

    #[test]
    fn rate_lookup_is_case_sensitive() {
        let raw = country("Lowland", 100, &["eur"]);
        let merged = merge_country(&raw, &rates(&[("EUR", 0.92)]), &mut FixedMultiplier(1500.0))
            .unwrap()
            .unwrap();

        assert_eq!(merged.exchange_rate, None);
        assert_eq!(merged.estimated_gdp, None);
    }

    #[test]
    fn matched_rate_uses_multiplier() {
        let raw = country("Nigeria", 2_000, &["NGN"]);
        let merged = merge_country(&raw, &rates(&[("NGN", 1600.0)]), &mut FixedMultiplier(1200.0))
            .unwrap()
            .unwrap();

        assert_eq!(merged.exchange_rate, Some(1600.0));
        assert_eq!(merged.estimated_gdp, Some(1500.0));
    }

    #[test]
    fn zero_rate_keeps_rate_but_nulls_gdp() {
        let raw = country("Zeroland", 2_000, &["ZZZ"]);
        let merged = merge_country(&raw, &rates(&[("ZZZ", 0.0)]), &mut FixedMultiplier(1200.0))
            .unwrap()
            .unwrap();

        assert_eq!(merged.exchange_rate, Some(0.0));
        assert_eq!(merged.estimated_gdp, None);
    }

    #[test]
    fn only_first_currency_is_used() {
        let raw = country("Switzerland", 8_654_622, &["CHF", "EUR"]);
        let merged = merge_country(
            &raw,
            &rates(&[("CHF", 0.88), ("EUR", 0.92)]),
            &mut FixedMultiplier(1000.0),
        )
        .unwrap()
        .unwrap();

        assert_eq!(merged.currency_code.as_deref(), Some("CHF"));
        assert_eq!(merged.exchange_rate, Some(0.88));
    }

    #[test]
    fn first_currency_without_code_fails_validation() {
        let mut raw = country("Nowhere", 10, &[]);
        raw.currencies = Some(vec![RawCurrency::default(), currency("EUR")]);

        let err = merge_country(&raw, &rates(&[("EUR", 0.92)]), &mut FixedMultiplier(1.0))
            .unwrap_err();
        assert_matches!(err, CoreError::Validation { field: "currency_code", .. });
    }

    #[test]
    fn blank_currency_code_fails_validation() {
        let raw = country("Blankland", 10, &["  "]);
        let err = merge_country(&raw, &RateTable::new(), &mut FixedMultiplier(1.0)).unwrap_err();
        assert_matches!(err, CoreError::Validation { field: "currency_code", .. });
    }

    #[test]
    fn missing_name_or_population_is_skipped() {
        let mut nameless = country("X", 10, &[]);
        nameless.name = None;
        let mut blank = country("X", 10, &[]);
        blank.name = Some("   ".to_string());
        let mut unpopulated = country("Y", 10, &[]);
        unpopulated.population = None;

        let m = &mut FixedMultiplier(1.0);
        assert!(merge_country(&nameless, &RateTable::new(), m).unwrap().is_none());
        assert!(merge_country(&blank, &RateTable::new(), m).unwrap().is_none());
        assert!(merge_country(&unpopulated, &RateTable::new(), m).unwrap().is_none());
    }

    #[test]
    fn negative_population_fails_validation() {
        let raw = country("Minus", -1, &[]);
        let err = merge_country(&raw, &RateTable::new(), &mut FixedMultiplier(1.0)).unwrap_err();
        assert_matches!(err, CoreError::Validation { field: "population", .. });
    }

    #[test]
    fn optional_fields_are_copied_verbatim() {
        let mut raw = country("Aruba", 106_766, &["AWG"]);
        raw.capital = None;
        raw.region = Some("Americas".to_string());

        let merged = merge_country(&raw, &RateTable::new(), &mut FixedMultiplier(1.0))
            .unwrap()
            .unwrap();
        assert_eq!(merged.capital, None);
        assert_eq!(merged.region.as_deref(), Some("Americas"));
        assert_eq!(merged.flag_url.as_deref(), Some("https://flagcdn.com/aruba.svg"));
    }

    #[test]
    fn merge_all_counts_skipped_entries() {
        let mut nameless = country("X", 10, &[]);
        nameless.name = None;
        let raws = vec![country("Austria", 8_917_205, &[]), nameless, country("Nigeria", 5, &["NGN"])];

        let outcome = merge_all(&raws, &rates(&[("NGN", 1.0)]), &mut FixedMultiplier(1000.0)).unwrap();
        assert_eq!(outcome.records.len(), 2);
        assert_eq!(outcome.skipped, 1);
        assert_eq!(outcome.records[1].estimated_gdp, Some(5000.0));
    }

    #[test]
    fn merge_all_fails_on_first_invalid_entry() {
        let raws = vec![country("Austria", 8_917_205, &[]), country("Blankland", 1, &[""])];
        let result = merge_all(&raws, &RateTable::new(), &mut FixedMultiplier(1000.0));
        assert_matches!(result, Err(CoreError::Validation { .. }));
    }

    #[test]
    fn random_multiplier_varies_between_runs() {
        let raw = country("Nigeria", 206_139_587, &["NGN"]);
        let table = rates(&[("NGN", 1600.23)]);

        let first = merge_country(&raw, &table, &mut RandomMultiplier::new()).unwrap().unwrap();
        let second = merge_country(&raw, &table, &mut RandomMultiplier::new()).unwrap().unwrap();

        let (a, b) = (first.estimated_gdp.unwrap(), second.estimated_gdp.unwrap());
        assert!(a > 0.0 && b > 0.0);
        assert_ne!(a, b);
    }
}
