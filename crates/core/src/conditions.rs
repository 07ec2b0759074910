//! Static catalog of medical conditions offered to waiting-list clients.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A medical condition a patient can be queued for.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Condition {
    #[schema(example = "flu")]
    pub id: String,
    #[schema(example = "Flu")]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Severity from 1 (mild) to 10 (critical).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(example = 3)]
    pub severity: Option<u8>,
}

const CATALOG: &[(&str, &str, &str, u8)] = &[
    ("flu", "Flu", "Seasonal influenza with fever and body aches", 3),
    ("cold", "Common cold", "Upper respiratory tract viral infection", 1),
    ("fracture", "Bone fracture", "Suspected or confirmed broken bone", 6),
    ("chest-pain", "Chest pain", "Acute chest pain requiring cardiac assessment", 9),
    ("asthma", "Asthma attack", "Acute shortness of breath with wheezing", 7),
    ("laceration", "Laceration", "Open wound requiring closure", 4),
    ("allergy", "Allergic reaction", "Allergic reaction without airway compromise", 5),
];

/// Returns the condition catalog in display order.
pub fn catalog() -> Vec<Condition> {
    CATALOG
        .iter()
        .map(|&(id, name, description, severity)| Condition {
            id: id.to_string(),
            name: name.to_string(),
            description: Some(description.to_string()),
            severity: Some(severity),
        })
        .collect()
}
