//! Filter and sort vocabulary for country listings.

use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

/* --------------------------------------------------------------------------
Sort tokens
-------------------------------------------------------------------------- */

/// Recognized `sort` query values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountrySort {
    GdpDesc,
    GdpAsc,
    PopulationDesc,
    PopulationAsc,
    NameAsc,
    NameDesc,
}

impl CountrySort {
    pub const ALL: [CountrySort; 6] = [
        CountrySort::GdpDesc,
        CountrySort::GdpAsc,
        CountrySort::PopulationDesc,
        CountrySort::PopulationAsc,
        CountrySort::NameAsc,
        CountrySort::NameDesc,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            CountrySort::GdpDesc => "gdp_desc",
            CountrySort::GdpAsc => "gdp_asc",
            CountrySort::PopulationDesc => "population_desc",
            CountrySort::PopulationAsc => "population_asc",
            CountrySort::NameAsc => "name_asc",
            CountrySort::NameDesc => "name_desc",
        }
    }

    fn valid_tokens() -> String {
        Self::ALL
            .iter()
            .map(|s| s.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for CountrySort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CountrySort {
    type Err = CoreError;

    /// Tokens are matched case-insensitively; anything else is rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|sort| sort.as_str() == token)
            .ok_or_else(|| {
                CoreError::validation(
                    "sort",
                    format!("unknown sort '{s}'. Valid values: {}", Self::valid_tokens()),
                )
            })
    }
}

/* --------------------------------------------------------------------------
Filter
-------------------------------------------------------------------------- */

/// Validated listing criteria.
///
/// `region` is a case-insensitive substring match, `currency` a
/// case-insensitive exact match on the currency code.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CountryFilter {
    pub region: Option<String>,
    pub currency: Option<String>,
    pub sort: Option<CountrySort>,
}

impl CountryFilter {
    /// Build a filter from raw query values. Blank values count as absent.
    pub fn from_params(
        region: Option<&str>,
        currency: Option<&str>,
        sort: Option<&str>,
    ) -> Result<Self, CoreError> {
        let sort = non_blank(sort).map(str::parse::<CountrySort>).transpose()?;

        Ok(Self {
            region: non_blank(region).map(str::to_string),
            currency: non_blank(currency).map(str::to_string),
            sort,
        })
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
