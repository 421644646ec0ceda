use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use crate::config::SelectorMap;
use crate::error::ExtractError;

/// Raw (pre-normalization) values located on one product page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawFields {
    pub title_text: String,
    pub price_text: String,
    pub highlight_texts: Vec<String>,
    /// Only present when the page has no highlight regions at all.
    pub meta_description: Option<String>,
    pub spec_rows: Vec<(String, String)>,
    pub image_ref: String,
    pub category_chain: Vec<String>,
    pub sold_text: Option<String>,
    /// Text nodes containing the favourites marker, in document order.
    pub favorites_texts: Vec<String>,
}

/// A [`SelectorMap`] with every CSS selector parsed once.
pub struct CompiledSelectors {
    title: Selector,
    price: Selector,
    highlight: Selector,
    meta_description: Selector,
    spec_row: Selector,
    spec_label: Selector,
    spec_value: Selector,
    spec_value_fallback: Selector,
    image_container: Selector,
    image_block: Selector,
    image_block_index: usize,
    image: Selector,
    image_attr: String,
    breadcrumb: Selector,
    breadcrumb_item: Selector,
    sold_count: Selector,
    favorites_marker: String,
    pub(crate) listing_item: Selector,
    pub(crate) listing_link: Selector,
}

fn parse_selector(field: &'static str, css: &str) -> Result<Selector, ExtractError> {
    Selector::parse(css).map_err(|e| ExtractError::InvalidSelector {
        field,
        reason: e.to_string(),
    })
}

impl CompiledSelectors {
    pub fn compile(map: &SelectorMap) -> Result<Self, ExtractError> {
        Ok(Self {
            title: parse_selector("title", &map.title)?,
            price: parse_selector("price", &map.price)?,
            highlight: parse_selector("highlight", &map.highlight)?,
            meta_description: parse_selector("meta_description", &map.meta_description)?,
            spec_row: parse_selector("spec_row", &map.spec_row)?,
            spec_label: parse_selector("spec_label", &map.spec_label)?,
            spec_value: parse_selector("spec_value", &map.spec_value)?,
            spec_value_fallback: parse_selector("spec_value_fallback", &map.spec_value_fallback)?,
            image_container: parse_selector("image_container", &map.image_container)?,
            image_block: parse_selector("image_block", &map.image_block)?,
            image_block_index: map.image_block_index,
            image: parse_selector("image", &map.image)?,
            image_attr: map.image_attr.clone(),
            breadcrumb: parse_selector("breadcrumb", &map.breadcrumb)?,
            breadcrumb_item: parse_selector("breadcrumb_item", &map.breadcrumb_item)?,
            sold_count: parse_selector("sold_count", &map.sold_count)?,
            favorites_marker: map.favorites_marker.clone(),
            listing_item: parse_selector("listing_item", &map.listing_item)?,
            listing_link: parse_selector("listing_link", "a[href]")?,
        })
    }
}

fn text_of(el: ElementRef) -> String {
    el.text().collect::<String>()
}

fn first_text(root: ElementRef, sel: &Selector) -> Option<String> {
    root.select(sel).next().map(|el| text_of(el).trim().to_string())
}

/// Locate every named region. Missing regions produce empty defaults, never errors.
pub fn extract_fields(doc: &Html, sel: &CompiledSelectors) -> RawFields {
    let root = doc.root_element();

    let title_text = first_text(root, &sel.title).unwrap_or_default();
    let price_text = first_text(root, &sel.price).unwrap_or_default();

    // One selector for both variants: each element is visited once, in document order.
    let highlight_texts: Vec<String> = root.select(&sel.highlight).map(text_of).collect();

    let meta_description = if highlight_texts.is_empty() {
        root.select(&sel.meta_description)
            .next()
            .and_then(|el| el.value().attr("content"))
            .map(str::to_string)
    } else {
        None
    };

    let spec_rows = root
        .select(&sel.spec_row)
        .filter_map(|row| {
            let label = first_text(row, &sel.spec_label);
            let value = first_text(row, &sel.spec_value)
                .or_else(|| first_text(row, &sel.spec_value_fallback));
            match (label, value) {
                (Some(label), Some(value)) => Some((label, value)),
                (label, _) => {
                    debug!(?label, "Skipping malformed specification row");
                    None
                }
            }
        })
        .collect();

    let image_ref = root
        .select(&sel.image_container)
        .next()
        .and_then(|container| container.select(&sel.image_block).nth(sel.image_block_index))
        .and_then(|block| block.select(&sel.image).next())
        .and_then(|img| img.value().attr(&sel.image_attr))
        .unwrap_or_default()
        .to_string();

    let category_chain = root
        .select(&sel.breadcrumb)
        .next()
        .map(|crumbs| {
            crumbs
                .select(&sel.breadcrumb_item)
                .map(|a| text_of(a).trim().to_string())
                .collect()
        })
        .unwrap_or_default();

    let sold_text = first_text(root, &sel.sold_count);

    let favorites_texts = if sel.favorites_marker.is_empty() {
        Vec::new()
    } else {
        root.text()
            .filter(|t| t.contains(sel.favorites_marker.as_str()))
            .map(str::to_string)
            .collect()
    };

    RawFields {
        title_text,
        price_text,
        highlight_texts,
        meta_description,
        spec_rows,
        image_ref,
        category_chain,
        sold_text,
        favorites_texts,
    }
}
