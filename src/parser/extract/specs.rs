use crate::graph::{FactRecord, Relationship};

const ALL_SKIN_TYPE: &str = "all skin type";

enum ValueHandling {
    Verbatim,
    CommaList,
    SkinType,
}

fn rule_for(label: &str) -> Option<(Relationship, ValueHandling)> {
    match label {
        "Brand" => Some((Relationship::HasBrand, ValueHandling::Verbatim)),
        "Ingredient Preference" | "Ingredient" => {
            Some((Relationship::HasIngredient, ValueHandling::CommaList))
        }
        "Skin Care Benefits" | "Benefits" => {
            Some((Relationship::HasBenefits, ValueHandling::CommaList))
        }
        "Skin Type" => Some((Relationship::HasSkinType, ValueHandling::SkinType)),
        "Product Form" | "Formulation" => Some((Relationship::HasForm, ValueHandling::Verbatim)),
        _ => None,
    }
}

/// Map specification rows to typed facts. Unknown labels are ignored.
pub fn classify(rows: &[(String, String)], product_id: u32) -> Vec<FactRecord> {
    let mut facts = Vec::new();

    for (label, value) in rows {
        let Some((relationship, handling)) = rule_for(label) else {
            continue;
        };
        let values: Vec<String> = match handling {
            ValueHandling::Verbatim => vec![value.clone()],
            ValueHandling::CommaList => value.split(',').map(|v| v.trim().to_string()).collect(),
            ValueHandling::SkinType if value.to_lowercase().contains(ALL_SKIN_TYPE) => {
                vec![ALL_SKIN_TYPE.to_string()]
            }
            ValueHandling::SkinType => vec![value.clone()],
        };
        facts.extend(
            values
                .into_iter()
                .filter(|v| !v.is_empty())
                .map(|v| FactRecord::new(product_id, relationship, v)),
        );
    }

    facts
}
