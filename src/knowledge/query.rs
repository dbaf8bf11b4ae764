//! SPARQL query builders for the knowledge graph
//!
//! Both queries select the country entity through its ISO-3166-1 alpha-3
//! property and return at most one row. The fast query reduces multi-valued
//! properties with `SAMPLE`, the slow one concatenates distinct labels.

use crate::country::CountryCode;

/// Output variables of the fast query
pub mod fast_vars {
    pub const HDI: &str = "hdi";
    pub const GDP_PER_CAPITA: &str = "gdpPerCapita";
    pub const LIFE_EXPECTANCY: &str = "lifeExpectancy";
    pub const LITERACY_RATE: &str = "literacyRate";
    pub const GOVERNMENT_TYPE: &str = "governmentType";
    pub const ARTICLE_TITLE: &str = "enwikiTitle";
}

/// Output variables of the slow query
pub mod slow_vars {
    pub const RELIGIONS: &str = "religions";
    pub const ETHNIC_GROUPS: &str = "ethnicGroups";
}

/// Separator used by `GROUP_CONCAT` in the slow query
pub const LIST_SEPARATOR: &str = ", ";

/// Scalar, government and article-title fields
pub fn fast_query(code: &CountryCode) -> String {
    format!(
        r#"SELECT ?item
       (SAMPLE(?hdiVal) AS ?{hdi})
       (SAMPLE(?gdpVal) AS ?{gdp})
       (SAMPLE(?lifeVal) AS ?{life})
       (SAMPLE(?litVal) AS ?{lit})
       (SAMPLE(?govLabel) AS ?{gov})
       (SAMPLE(?enTitle) AS ?{title})
WHERE {{
  ?item wdt:P298 "{code}".
  OPTIONAL {{ ?item wdt:P122 ?gov . ?gov rdfs:label ?govLabel . FILTER(LANG(?govLabel) = "en") }}
  OPTIONAL {{ ?item p:P1081/ps:P1081 ?hdiVal }}
  OPTIONAL {{ ?item p:P2132/ps:P2132 ?gdpVal }}
  OPTIONAL {{ ?item p:P2250/ps:P2250 ?lifeVal }}
  OPTIONAL {{ ?item p:P6897/ps:P6897 ?litVal }}
  OPTIONAL {{
    ?enwiki schema:about ?item ;
            schema:isPartOf <https://en.wikipedia.org/> ;
            schema:name ?enTitle .
  }}
}}
GROUP BY ?item
LIMIT 1"#,
        hdi = fast_vars::HDI,
        gdp = fast_vars::GDP_PER_CAPITA,
        life = fast_vars::LIFE_EXPECTANCY,
        lit = fast_vars::LITERACY_RATE,
        gov = fast_vars::GOVERNMENT_TYPE,
        title = fast_vars::ARTICLE_TITLE,
        code = code,
    )
}

/// Multi-valued cultural fields
pub fn slow_query(code: &CountryCode) -> String {
    format!(
        r#"SELECT ?item
       (GROUP_CONCAT(DISTINCT ?religionLabel; separator="{sep}") AS ?{religions})
       (GROUP_CONCAT(DISTINCT ?ethnicLabel; separator="{sep}") AS ?{ethnic})
WHERE {{
  ?item wdt:P298 "{code}".
  OPTIONAL {{ ?item wdt:P140 ?religion . ?religion rdfs:label ?religionLabel . FILTER(LANG(?religionLabel) = "en") }}
  OPTIONAL {{ ?item wdt:P172 ?ethnic . ?ethnic rdfs:label ?ethnicLabel . FILTER(LANG(?ethnicLabel) = "en") }}
}}
GROUP BY ?item
LIMIT 1"#,
        sep = LIST_SEPARATOR,
        religions = slow_vars::RELIGIONS,
        ethnic = slow_vars::ETHNIC_GROUPS,
        code = code,
    )
}
