use std::path::{Path, PathBuf};

use serde::Deserialize;

const ENV_PREFIX: &str = "PRODUCT_GRAPH";

/// How free-text highlight lines are filtered into description lines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HighlightRule {
    /// Drop lines mentioning section headings or the title; keep the rest lowercased.
    #[default]
    ExclusionList,
    /// Keep lines after a "key ingredients" heading, drop usage/expiry noise, keep casing.
    MarkerTriggered,
}

/// Where description lines end up in the graph.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DescriptionMode {
    /// One `hasDescription` fact per line.
    #[default]
    Facts,
    /// A single `description` string on the product record.
    Inline,
}

/// Whether (and how strictly) the favourites/sold counters are extracted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CountFields {
    #[default]
    Off,
    /// A page without the favourites marker fails extraction.
    Strict,
    /// A page without the favourites marker gets `null`.
    Lenient,
}

/// CSS lookups for every region of a product page. Class names follow the site's markup,
/// so a layout change is a settings change.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SelectorMap {
    pub title: String,
    pub price: String,
    pub highlight: String,
    pub meta_description: String,
    pub spec_row: String,
    pub spec_label: String,
    pub spec_value: String,
    pub spec_value_fallback: String,
    pub image_container: String,
    pub image_block: String,
    pub image_block_index: usize,
    pub image: String,
    pub image_attr: String,
    pub breadcrumb: String,
    pub breadcrumb_item: String,
    pub sold_count: String,
    /// Plain substring, not a selector: text nodes containing it carry the favourites count.
    pub favorites_marker: String,
    /// Product tiles on a saved search-results page.
    pub listing_item: String,
}

impl Default for SelectorMap {
    fn default() -> Self {
        Self {
            title: ".WBVL_7".into(),
            price: ".G27FPf".into(),
            highlight: "p.QN2lPu, div.QN2lPu".into(),
            meta_description: r#"meta[name="description"]"#.into(),
            spec_row: "div.Tq1nbH".into(),
            spec_label: "label".into(),
            spec_value: "div".into(),
            spec_value_fallback: "a".into(),
            image_container: "div.airUhU".into(),
            image_block: "div".into(),
            image_block_index: 1,
            image: "img.IMAW1w".into(),
            image_attr: "src".into(),
            breadcrumb: "div.idLK2l".into(),
            breadcrumb_item: "a".into(),
            sold_count: "div.AcmPRb".into(),
            favorites_marker: "Favorite".into(),
            listing_item: "li.shopee-search-item-result__item".into(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub input_dir: PathBuf,
    pub output: PathBuf,
    pub pretty: bool,
    pub highlight_rule: HighlightRule,
    pub description_mode: DescriptionMode,
    pub category_literal: Option<String>,
    pub count_fields: CountFields,
    pub base_url: String,
    pub selectors: SelectorMap,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("productpages"),
            output: PathBuf::from("graph.json"),
            pretty: false,
            highlight_rule: HighlightRule::default(),
            description_mode: DescriptionMode::default(),
            category_literal: None,
            count_fields: CountFields::default(),
            base_url: "https://shopee.sg".into(),
            selectors: SelectorMap::default(),
        }
    }
}

impl Settings {
    /// Defaults, then the optional TOML file, then `PRODUCT_GRAPH_*` environment variables
    /// (`__` separates nested keys, e.g. `PRODUCT_GRAPH_SELECTORS__TITLE`).
    pub fn load(path: Option<&Path>) -> Result<Self, ::config::ConfigError> {
        let mut builder = ::config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(::config::File::from(path).required(true));
        }
        builder
            .add_source(
                ::config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}
