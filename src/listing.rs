use std::sync::LazyLock;

use regex::Regex;
use scraper::Html;

use crate::parser::fields::CompiledSelectors;
use crate::parser::text::normalize;

static DIGITS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[0-9]+").unwrap());

/// Product page URLs from a saved search-results page, in document order.
pub fn extract_product_urls(html: &str, selectors: &CompiledSelectors, base_url: &str) -> Vec<String> {
    let doc = Html::parse_document(html);
    let base = base_url.trim_end_matches('/');
    doc.select(&selectors.listing_item)
        .filter_map(|item| item.select(&selectors.listing_link).next())
        .filter_map(|a| a.value().attr("href"))
        .map(|href| {
            if href.starts_with("http") {
                href.to_string()
            } else {
                format!("{}{}", base, href)
            }
        })
        .collect()
}

/// File name a fetched product page is stored under: digits dropped, symbols stripped.
pub fn page_file_name(url: &str) -> String {
    let without_ids = DIGITS_RE.replace_all(url, "");
    format!("{}.html", normalize(&without_ids).replace(' ', "_"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SelectorMap;

    #[test]
    fn listing_links() {
        let html = r#"
            <ul>
              <li class="shopee-search-item-result__item"><a href="/COSRX-Cleanser-i.1.2">x</a></li>
              <li class="shopee-search-item-result__item"><div>sponsored</div></li>
              <li class="shopee-search-item-result__item"><a href="https://shopee.sg/Klairs-Toner-i.3.4">y</a></li>
              <li class="other"><a href="/ignored">z</a></li>
            </ul>"#;
        let selectors = CompiledSelectors::compile(&SelectorMap::default()).unwrap();
        assert_eq!(
            extract_product_urls(html, &selectors, "https://shopee.sg/"),
            vec![
                "https://shopee.sg/COSRX-Cleanser-i.1.2",
                "https://shopee.sg/Klairs-Toner-i.3.4",
            ]
        );
    }

    #[test]
    fn file_names() {
        assert_eq!(
            page_file_name("https://shopee.sg/Gel-Cleanser-i.12.34"),
            "httpsshopeesgGelCleanseri.html"
        );
        assert_eq!(page_file_name("https://shopee.sg/Aloe Gel 300ml"), "httpsshopeesgAloe_Gel_ml.html");
    }
}
