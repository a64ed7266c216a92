//! Static report configuration: which census tables feed each statistic,
//! how their columns collapse into report categories, and which
//! geographies make up each hub.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// How a category picks its columns out of a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selector {
    /// Human-readable column labels, resolved to column ids per response.
    /// A label may match several columns (e.g. male and female rows).
    Labels(&'static [&'static str]),
    /// Column ids that are stable across geographies.
    Columns(&'static [&'static str]),
}

/// A named report bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Category {
    pub name: &'static str,
    pub selector: Selector,
}

const fn labels(name: &'static str, labels: &'static [&'static str]) -> Category {
    Category {
        name,
        selector: Selector::Labels(labels),
    }
}

const fn columns(name: &'static str, columns: &'static [&'static str]) -> Category {
    Category {
        name,
        selector: Selector::Columns(columns),
    }
}

static AGE_CATEGORIES: &[Category] = &[
    labels("0-9", &["Under 5 years", "5 to 9 years"]),
    labels("10-19", &["10 to 14 years", "15 to 17 years", "18 and 19 years"]),
    labels(
        "20-29",
        &["20 years", "21 years", "22 to 24 years", "25 to 29 years"],
    ),
    labels("30-39", &["30 to 34 years", "35 to 39 years"]),
    labels("40-49", &["40 to 44 years", "45 to 49 years"]),
    labels("50-59", &["50 to 54 years", "55 to 59 years"]),
    labels(
        "60-69",
        &[
            "60 and 61 years",
            "62 to 64 years",
            "65 and 66 years",
            "67 to 69 years",
        ],
    ),
    labels(
        "70+",
        &[
            "70 to 74 years",
            "75 to 79 years",
            "80 to 84 years",
            "85 years and over",
        ],
    ),
];

static RACE_CATEGORIES: &[Category] = &[
    columns("White", &["B03002003"]),
    columns("Hispanic", &["B03002012"]),
    columns("Black", &["B03002004"]),
    columns("Asian", &["B03002006"]),
    columns("Other", &["B03002007", "B03002008"]),
    columns("Two+", &["B03002009"]),
];

static LANGUAGE_CATEGORIES: &[Category] = &[
    columns("English Only", &["B16007009"]),
    columns("Spanish", &["B16007010"]),
    columns("Other", &["B16007011", "B16007012", "B16007013"]),
];

static INCOME_CATEGORIES: &[Category] = &[
    labels(
        "$0-24k",
        &[
            "Less than $10,000",
            "$10,000 to $14,999",
            "$15,000 to $19,999",
            "$20,000 to $24,999",
        ],
    ),
    labels(
        "$25k-49k",
        &[
            "$25,000 to $29,999",
            "$30,000 to $34,999",
            "$35,000 to $39,999",
            "$40,000 to $44,999",
            "$45,000 to $49,999",
        ],
    ),
    labels("$50k-74k", &["$50,000 to $59,999", "$60,000 to $74,999"]),
    labels("$75k-100k", &["$75,000 to $99,999"]),
    labels("$100k-$124k", &["$100,000 to $124,999"]),
    labels("$125k-$149k", &["$125,000 to $149,999"]),
    labels("$150k-$200k", &["$150,000 to $199,999"]),
    labels("$200k+", &["$200,000 or more"]),
];

/// One of the four demographic breakdowns in the report.
///
/// Declaration order is report column order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Statistic {
    Age,
    Race,
    Language,
    Income,
}

impl Statistic {
    pub const ALL: [Statistic; 4] = [
        Statistic::Age,
        Statistic::Race,
        Statistic::Language,
        Statistic::Income,
    ];

    /// Census table code the statistic is computed from.
    pub fn table_id(self) -> &'static str {
        match self {
            Statistic::Age => "B01001",
            Statistic::Race => "B03002",
            Statistic::Language => "B16007",
            Statistic::Income => "B19001",
        }
    }

    pub fn categories(self) -> &'static [Category] {
        match self {
            Statistic::Age => AGE_CATEGORIES,
            Statistic::Race => RACE_CATEGORIES,
            Statistic::Language => LANGUAGE_CATEGORIES,
            Statistic::Income => INCOME_CATEGORIES,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Statistic::Age => "age",
            Statistic::Race => "race",
            Statistic::Language => "language",
            Statistic::Income => "income",
        }
    }
}

// Geography ids are census reporter geo ids:
//   04000USss     state
//   05000USsssccc county
//   33000USnnn    combined statistical area
static BUILTIN_HUBS: &[(&str, &[&str])] = &[
    (
        "Southern CA",
        &[
            "05000US06037", // Los Angeles
            "05000US06073", // San Diego
            "05000US06059", // Orange
            "05000US06065", // Riverside
            "05000US06071", // San Bernardino
            "05000US06029", // Kern
            "05000US06111", // Ventura
            "05000US06083", // Santa Barbara
            "05000US06079", // San Luis Obispo
            "05000US06025", // Imperial
        ],
    ),
    (
        "Northern CA",
        &[
            "05000US06001", // Alameda
            "05000US06003", // Alpine
            "05000US06005", // Amador
            "05000US06007", // Butte
            "05000US06009", // Calaveras
            "05000US06011", // Colusa
            "05000US06013", // Contra Costa
            "05000US06015", // Del Norte
            "05000US06017", // El Dorado
            "05000US06019", // Fresno
            "05000US06021", // Glenn
            "05000US06023", // Humboldt
            "05000US06027", // Inyo
            "05000US06031", // Kings
            "05000US06033", // Lake
            "05000US06035", // Lassen
            "05000US06039", // Madera
            "05000US06041", // Marin
            "05000US06043", // Mariposa
            "05000US06045", // Mendocino
            "05000US06047", // Merced
            "05000US06049", // Modoc
            "05000US06051", // Mono
            "05000US06053", // Monterey
            "05000US06055", // Napa
            "05000US06057", // Nevada
            "05000US06061", // Placer
            "05000US06063", // Plumas
            "05000US06067", // Sacramento
            "05000US06069", // San Benito
            "05000US06075", // San Francisco
            "05000US06077", // San Joaquin
            "05000US06081", // San Mateo
            "05000US06085", // Santa Clara
            "05000US06087", // Santa Cruz
            "05000US06089", // Shasta
            "05000US06091", // Sierra
            "05000US06093", // Siskiyou
            "05000US06095", // Solano
            "05000US06097", // Sonoma
            "05000US06099", // Stanislaus
            "05000US06101", // Sutter
            "05000US06103", // Tehama
            "05000US06105", // Trinity
            "05000US06107", // Tulare
            "05000US06109", // Tuolumne
            "05000US06113", // Yolo
            "05000US06115", // Yuba
        ],
    ),
    (
        "Pacific Northwest",
        &[
            "04000US53", // Washington
            "04000US41", // Oregon
        ],
    ),
    ("Ohio", &["04000US39"]),
    (
        "Illinois",
        &[
            "04000US17",    // Illinois
            "05000US55059", // WI - Kenosha
            "05000US18089", // IN - Lake
            "05000US18127", // IN - Porter
            "05000US18111", // IN - Newton
            "05000US18073", // IN - Jasper
            "05000US18091", // IN - LaPorte
        ],
    ),
    (
        "Philadelphia",
        &[
            "33000US428",   // Philadelphia-Reading-Camden CSA
            "05000US10005", // DE - Sussex
            "05000US42071", // PA - Lancaster
            "33000US276",   // Harrisburg-York-Lebanon CSA
        ],
    ),
    ("New York City", &["33000US408"]),
    (
        "New England",
        &[
            "04000US23",    // Maine
            "04000US50",    // Vermont
            "04000US33",    // New Hampshire
            "04000US25",    // Massachusetts
            "05000US09003", // CT - Hartford
            "05000US09007", // CT - Middlesex
            "05000US09013", // CT - Tolland
            "05000US09015", // CT - Windham
            "05000US09011", // CT - New London
        ],
    ),
    (
        "Mid Atlantic",
        &[
            "33000US548",   // Washington-Baltimore-Arlington CSA
            "05000US24029", // MD - Kent
            "05000US24011", // MD - Caroline
            "05000US24045", // MD - Wicomico
            "05000US24039", // MD - Somerset
            "05000US24047", // MD - Worcester
        ],
    ),
    (
        "South Atlantic",
        &[
            "04000US37", // North Carolina
            "04000US45", // South Carolina
        ],
    ),
];

/// A named group of geographies reported as one row.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Hub {
    pub name: String,
    pub geo_ids: Vec<String>,
}

/// Ordered hub list. Order is output row order.
///
/// Loaded from TOML as an array of tables:
/// ```toml
/// [[hub]]
/// name = "Ohio"
/// geo_ids = ["04000US39"]
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HubConfig {
    #[serde(rename = "hub", default)]
    pub hubs: Vec<Hub>,
}

impl HubConfig {
    pub fn builtin() -> Self {
        let hubs = BUILTIN_HUBS
            .iter()
            .map(|(name, geo_ids)| Hub {
                name: name.to_string(),
                geo_ids: geo_ids.iter().map(|g| g.to_string()).collect(),
            })
            .collect();
        Self { hubs }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read hubs file: {:?}", path))?;
        Self::from_toml(&content).with_context(|| format!("Failed to parse hubs file: {:?}", path))
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Keeps only the named hubs, in configuration order.
    ///
    /// An empty selection keeps everything; an unknown name is an error.
    pub fn select(self, names: &[String]) -> Result<Self> {
        if names.is_empty() {
            return Ok(self);
        }

        if let Some(missing) = names
            .iter()
            .find(|n| !self.hubs.iter().any(|h| &h.name == *n))
        {
            anyhow::bail!("unknown hub '{missing}'");
        }

        let hubs = self
            .hubs
            .into_iter()
            .filter(|h| names.contains(&h.name))
            .collect();
        Ok(Self { hubs })
    }

    /// Geographies listed under more than one hub, with the hubs naming them.
    pub fn overlapping_geographies(&self) -> BTreeMap<&str, Vec<&str>> {
        let mut owners: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
        for hub in &self.hubs {
            for geo_id in &hub.geo_ids {
                let entry = owners.entry(geo_id.as_str()).or_default();
                if !entry.contains(&hub.name.as_str()) {
                    entry.push(hub.name.as_str());
                }
            }
        }
        owners.retain(|_, hubs| hubs.len() > 1);
        owners
    }
}
