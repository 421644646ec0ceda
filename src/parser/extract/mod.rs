pub mod highlights;
pub mod specs;

use crate::config::{CountFields, DescriptionMode, Settings};
use crate::error::ExtractError;
use crate::graph::{Counts, FactRecord, ProductRecord, Record, Relationship, Volume};

use super::fields::RawFields;
use super::text::{extract_quantity, first_integer, format_quantity, min_price, normalize};

/// Everything extracted from one page, before it is given an identifier.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedProduct {
    pub title: String,
    pub price: f64,
    pub volume: Volume,
    pub image_url: String,
    pub category: String,
    /// Set only in inline description mode.
    pub description: Option<String>,
    /// Description lines emitted as facts (empty in inline mode).
    pub description_lines: Vec<String>,
    pub spec_rows: Vec<(String, String)>,
    pub counts: Option<Counts>,
}

pub fn extract_product(
    fields: &RawFields,
    settings: &Settings,
) -> Result<ExtractedProduct, ExtractError> {
    let title = normalize(&fields.title_text);

    let volume = match extract_quantity(&title) {
        Some((value, unit)) => Volume::Measured(format_quantity(value, unit)),
        None => Volume::Unknown,
    };

    let lines = match &fields.meta_description {
        Some(meta) if fields.highlight_texts.is_empty() => highlights::from_meta_description(meta),
        _ => highlights::classify(&fields.highlight_texts, &title, settings.highlight_rule),
    };
    let (description, description_lines) = match settings.description_mode {
        DescriptionMode::Facts => (None, lines),
        DescriptionMode::Inline => (Some(lines.join(" ")), Vec::new()),
    };

    let category = match &settings.category_literal {
        Some(literal) => literal.clone(),
        None => fields.category_chain.last().cloned().unwrap_or_default(),
    };

    Ok(ExtractedProduct {
        price: min_price(&fields.price_text),
        volume,
        image_url: fields.image_ref.clone(),
        category,
        description,
        description_lines,
        spec_rows: fields.spec_rows.clone(),
        counts: extract_counts(fields, settings)?,
        title,
    })
}

fn extract_counts(fields: &RawFields, settings: &Settings) -> Result<Option<Counts>, ExtractError> {
    if settings.count_fields == CountFields::Off {
        return Ok(None);
    }
    let fav_num = fields.favorites_texts.iter().find_map(|t| first_integer(t));
    if fav_num.is_none() && settings.count_fields == CountFields::Strict {
        return Err(ExtractError::MissingMarker {
            marker: settings.selectors.favorites_marker.clone(),
        });
    }
    Ok(Some(Counts {
        fav_num,
        sold_num: fields.sold_text.clone(),
    }))
}

impl ExtractedProduct {
    /// One product record followed by its description and specification facts.
    pub fn into_records(self, product_id: u32) -> Vec<Record> {
        let mut records = Vec::with_capacity(1 + self.description_lines.len() + self.spec_rows.len());
        records.push(Record::Product(ProductRecord {
            product_id,
            title: self.title,
            price: self.price,
            volume: self.volume,
            image_url: self.image_url,
            category: self.category,
            description: self.description,
            counts: self.counts,
        }));
        records.extend(self.description_lines.into_iter().map(|line| {
            Record::Fact(FactRecord::new(product_id, Relationship::HasDescription, line))
        }));
        records.extend(
            specs::classify(&self.spec_rows, product_id)
                .into_iter()
                .map(Record::Fact),
        );
        records
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HighlightRule;

    fn cleanser_fields() -> RawFields {
        RawFields {
            title_text: "COSRX Low-pH Good Morning Gel Cleanser 150ml".into(),
            price_text: "$12.90 - $15.50".into(),
            highlight_texts: vec![
                "A gentle, low-pH gel cleanser.".into(),
                "How to use".into(),
                "Apply on wet face.".into(),
            ],
            meta_description: None,
            spec_rows: vec![
                ("Brand".into(), "COSRX".into()),
                ("Ingredient".into(), "Tea Tree Oil, BHA".into()),
            ],
            image_ref: "https://cf.shopee.sg/file/x".into(),
            category_chain: vec!["Beauty".into(), "Cleansers".into()],
            sold_text: Some("2.1k Sold".into()),
            favorites_texts: vec!["Favorite".into(), "Favorite (1234)".into()],
        }
    }

    #[test]
    fn default_settings() {
        let p = extract_product(&cleanser_fields(), &Settings::default()).unwrap();
        assert_eq!(p.title, "COSRX LowpH Good Morning Gel Cleanser 150ml");
        assert_eq!(p.price, 12.9);
        assert_eq!(p.volume, Volume::Measured("150.0ml".into()));
        assert_eq!(p.category, "Cleansers");
        assert_eq!(p.description, None);
        assert_eq!(
            p.description_lines,
            vec!["a gentle lowph gel cleanser", "apply on wet face"]
        );
        assert_eq!(p.counts, None);
    }

    #[test]
    fn records_in_order() {
        let records = extract_product(&cleanser_fields(), &Settings::default())
            .unwrap()
            .into_records(7);
        assert_eq!(records.len(), 1 + 2 + 3);
        assert!(matches!(&records[0], Record::Product(p) if p.product_id == 7));
        let rels: Vec<Relationship> = records[1..]
            .iter()
            .map(|r| match r {
                Record::Fact(f) => f.relationship,
                Record::Product(_) => panic!("unexpected product record"),
            })
            .collect();
        assert_eq!(
            rels,
            vec![
                Relationship::HasDescription,
                Relationship::HasDescription,
                Relationship::HasBrand,
                Relationship::HasIngredient,
                Relationship::HasIngredient,
            ]
        );
        assert!(records.iter().all(|r| r.product_id() == 7));
    }

    #[test]
    fn missing_regions_fall_back_to_defaults() {
        let p = extract_product(&RawFields::default(), &Settings::default()).unwrap();
        assert_eq!(p.title, "");
        assert_eq!(p.price, 0.0);
        assert_eq!(p.volume, Volume::Unknown);
        assert_eq!(p.category, "");
        assert!(p.description_lines.is_empty());
    }

    #[test]
    fn meta_description_used_without_highlights() {
        let fields = RawFields {
            meta_description: Some("Buy COSRX Cleanser online!".into()),
            ..RawFields::default()
        };
        let p = extract_product(&fields, &Settings::default()).unwrap();
        assert_eq!(p.description_lines, vec!["Buy COSRX Cleanser online"]);
    }

    #[test]
    fn inline_description_and_literal_category() {
        let settings = Settings {
            description_mode: DescriptionMode::Inline,
            highlight_rule: HighlightRule::MarkerTriggered,
            category_literal: Some("Exfoliators & Scrubs".into()),
            ..Settings::default()
        };
        let p = extract_product(&cleanser_fields(), &settings).unwrap();
        assert_eq!(p.description.as_deref(), Some("A gentle lowpH gel cleanser"));
        assert!(p.description_lines.is_empty());
        assert_eq!(p.category, "Exfoliators & Scrubs");
    }

    #[test]
    fn count_fields_strict_and_lenient() {
        let strict = Settings { count_fields: CountFields::Strict, ..Settings::default() };
        let p = extract_product(&cleanser_fields(), &strict).unwrap();
        assert_eq!(
            p.counts,
            Some(Counts { fav_num: Some(1234), sold_num: Some("2.1k Sold".into()) })
        );

        let bare = RawFields::default();
        let err = extract_product(&bare, &strict).unwrap_err();
        assert!(matches!(err, ExtractError::MissingMarker { ref marker } if marker == "Favorite"));

        let lenient = Settings { count_fields: CountFields::Lenient, ..Settings::default() };
        let p = extract_product(&bare, &lenient).unwrap();
        assert_eq!(p.counts, Some(Counts { fav_num: None, sold_num: None }));
    }
}
