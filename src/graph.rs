use std::collections::HashSet;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Serialize, Serializer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Relationship {
    HasDescription,
    HasBrand,
    HasIngredient,
    HasBenefits,
    HasSkinType,
    HasForm,
}

impl Relationship {
    pub fn entity_type(self) -> &'static str {
        match self {
            Relationship::HasDescription => "description",
            Relationship::HasBrand => "brand",
            Relationship::HasIngredient => "ingredient",
            Relationship::HasBenefits => "benefits",
            Relationship::HasSkinType => "skintype",
            Relationship::HasForm => "form",
        }
    }
}

/// Quantity parsed from the title: `"150.0ml"`, or the number `0` when absent.
#[derive(Debug, Clone, PartialEq)]
pub enum Volume {
    Measured(String),
    Unknown,
}

impl Serialize for Volume {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Volume::Measured(v) => serializer.serialize_str(v),
            Volume::Unknown => serializer.serialize_u8(0),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Counts {
    pub fav_num: Option<u64>,
    pub sold_num: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductRecord {
    pub product_id: u32,
    pub title: String,
    pub price: f64,
    pub volume: Volume,
    pub image_url: String,
    pub category: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(flatten)]
    pub counts: Option<Counts>,
}

/// One graph edge: `product_id --relationship--> (entity_type, entity_value)`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FactRecord {
    pub product_id: u32,
    pub relationship: Relationship,
    pub entity_type: &'static str,
    pub entity_value: String,
}

impl FactRecord {
    pub fn new(product_id: u32, relationship: Relationship, entity_value: String) -> Self {
        Self {
            product_id,
            relationship,
            entity_type: relationship.entity_type(),
            entity_value,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Record {
    Product(ProductRecord),
    Fact(FactRecord),
}

impl Record {
    pub fn product_id(&self) -> u32 {
        match self {
            Record::Product(p) => p.product_id,
            Record::Fact(f) => f.product_id,
        }
    }

    /// Key-sorted JSON of the record, so field order never affects equality.
    fn canonical_key(&self) -> serde_json::Result<String> {
        // serde_json::Map is a BTreeMap here, so object keys come out sorted.
        serde_json::to_value(self).map(|v| v.to_string())
    }
}

/// Deduplicated records ordered by `product_id`, ties in insertion order.
#[derive(Debug, Default, Serialize)]
#[serde(transparent)]
pub struct Graph {
    records: Vec<Record>,
}

impl Graph {
    /// Returns the graph and the number of duplicate records dropped.
    pub fn from_records(records: Vec<Record>) -> Result<(Self, usize)> {
        let total = records.len();
        let mut seen = HashSet::with_capacity(total);
        let mut unique = Vec::with_capacity(total);
        for record in records {
            if seen.insert(record.canonical_key()?) {
                unique.push(record);
            }
        }
        unique.sort_by_key(Record::product_id);
        let removed = total - unique.len();
        Ok((Self { records: unique }, removed))
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn products(&self) -> impl Iterator<Item = &ProductRecord> {
        self.records.iter().filter_map(|r| match r {
            Record::Product(p) => Some(p),
            Record::Fact(_) => None,
        })
    }

    pub fn facts(&self) -> impl Iterator<Item = &FactRecord> {
        self.records.iter().filter_map(|r| match r {
            Record::Fact(f) => Some(f),
            Record::Product(_) => None,
        })
    }

    pub fn to_json(&self, pretty: bool) -> Result<String> {
        let json = if pretty {
            serde_json::to_string_pretty(self)?
        } else {
            serde_json::to_string(self)?
        };
        Ok(json)
    }

    pub fn write(&self, path: &Path, pretty: bool) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let file =
            File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
        let mut out = BufWriter::new(file);
        out.write_all(self.to_json(pretty)?.as_bytes())?;
        out.flush()?;
        Ok(())
    }
}
