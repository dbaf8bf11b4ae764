//! Country facts as supplied by the facts provider

use super::code::CountryCode;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Common and official name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountryName {
    pub common: String,
    #[serde(default)]
    pub official: String,
}

/// Raster/vector references for a flag or coat of arms
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImageRefs {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub png: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub svg: Option<String>,
    /// Accessible description (flags only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
}

impl ImageRefs {
    /// Preferred reference: vector first, raster otherwise
    pub fn preferred(&self) -> Option<&str> {
        self.svg.as_deref().or(self.png.as_deref())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Currency {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
}

/// Normalized facts record for one country
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CountryFacts {
    pub name: CountryName,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cca2: Option<String>,
    pub cca3: CountryCode,
    #[serde(default)]
    pub flags: ImageRefs,
    #[serde(default)]
    pub capital: Vec<String>,
    #[serde(default)]
    pub population: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub area: Option<f64>,
    #[serde(default)]
    pub region: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subregion: Option<String>,
    #[serde(default)]
    pub continents: Vec<String>,
    #[serde(default)]
    pub borders: Vec<CountryCode>,
    /// Language code → language name
    #[serde(default)]
    pub languages: BTreeMap<String, String>,
    /// Currency code → name and symbol
    #[serde(default)]
    pub currencies: BTreeMap<String, Currency>,
    #[serde(default)]
    pub timezones: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub independent: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub un_member: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub landlocked: Option<bool>,
    #[serde(default)]
    pub coat_of_arms: ImageRefs,
}

/// One entry of a name search or bulk listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchHit {
    pub display_name: String,
    pub official_name: String,
    pub flags: ImageRefs,
    pub code: CountryCode,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_provider_shape() {
        let raw = r#"{
            "name": {"common": "Germany", "official": "Federal Republic of Germany",
                     "nativeName": {"deu": {"official": "Bundesrepublik Deutschland", "common": "Deutschland"}}},
            "cca2": "DE",
            "cca3": "DEU",
            "independent": true,
            "unMember": true,
            "currencies": {"EUR": {"name": "Euro", "symbol": "€"}},
            "capital": ["Berlin"],
            "region": "Europe",
            "subregion": "Western Europe",
            "languages": {"deu": "German"},
            "landlocked": false,
            "borders": ["AUT", "BEL", "CZE"],
            "area": 357114.0,
            "population": 83240525,
            "timezones": ["UTC+01:00"],
            "continents": ["Europe"],
            "flags": {"png": "https://flagcdn.com/w320/de.png", "svg": "https://flagcdn.com/de.svg"},
            "coatOfArms": {}
        }"#;

        let facts: CountryFacts = serde_json::from_str(raw).unwrap();
        assert_eq!(facts.cca3.as_str(), "DEU");
        assert_eq!(facts.borders.len(), 3);
        assert_eq!(facts.currencies["EUR"].symbol.as_deref(), Some("€"));
        assert_eq!(facts.un_member, Some(true));
        assert_eq!(facts.coat_of_arms, ImageRefs::default());
        assert_eq!(facts.flags.preferred(), Some("https://flagcdn.com/de.svg"));
    }

    #[test]
    fn test_missing_optional_fields_default() {
        let raw = r#"{"name": {"common": "Antarctica"}, "cca3": "ATA"}"#;
        let facts: CountryFacts = serde_json::from_str(raw).unwrap();
        assert!(facts.capital.is_empty());
        assert_eq!(facts.population, 0);
        assert!(facts.subregion.is_none());

        let json = serde_json::to_value(&facts).unwrap();
        assert!(json.get("subregion").is_none());
        assert_eq!(json["cca3"], "ATA");
    }
}
