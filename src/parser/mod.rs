pub mod extract;
pub mod fields;
pub mod text;

use scraper::Html;

use crate::config::Settings;
use crate::error::ExtractError;
use crate::graph::Record;
use extract::ExtractedProduct;
use fields::CompiledSelectors;

/// Markup → raw fields → cleaned product. The parsed tree is dropped before returning.
pub fn process_document(
    html: &str,
    selectors: &CompiledSelectors,
    settings: &Settings,
) -> Result<ExtractedProduct, ExtractError> {
    let doc = Html::parse_document(html);
    let raw = fields::extract_fields(&doc, selectors);
    extract::extract_product(&raw, settings)
}

/// One product record plus its facts for a single page.
pub fn assemble(
    html: &str,
    product_id: u32,
    selectors: &CompiledSelectors,
    settings: &Settings,
) -> Result<Vec<Record>, ExtractError> {
    Ok(process_document(html, selectors, settings)?.into_records(product_id))
}
