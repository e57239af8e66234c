//! Normalized, version-agnostic view of an EDMX document

use serde::{Deserialize, Serialize};

/// Parse output of one EDMX document.
///
/// Records from every schema block are concatenated in document order.
/// Names are taken verbatim and are not deduplicated across schemas.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedSchema {
    #[serde(default)]
    pub namespaces: Vec<String>,
    pub entities: Vec<EntityType>,
    pub entity_sets: Vec<EntitySet>,
    pub associations: Vec<Association>,
    pub complex_types: Vec<ComplexType>,
    pub functions: Vec<Operation>,
    pub actions: Vec<Operation>,
}

impl NormalizedSchema {
    pub fn entity(&self, name: &str) -> Option<&EntityType> {
        self.entities.iter().find(|e| e.name == name)
    }

    pub fn entity_set(&self, name: &str) -> Option<&EntitySet> {
        self.entity_sets.iter().find(|s| s.name == name)
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
            && self.entity_sets.is_empty()
            && self.associations.is_empty()
            && self.complex_types.is_empty()
            && self.functions.is_empty()
            && self.actions.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityType {
    pub name: String,
    /// Key property names in `PropertyRef` order
    pub keys: Vec<String>,
    pub properties: Vec<Property>,
    pub navigation_properties: Vec<NavigationProperty>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
    /// `true` unless the document says `Nullable="false"`
    pub nullable: bool,
    /// `None` when absent or `MaxLength="max"`
    pub max_length: Option<u32>,
    /// Annotation term identifiers; payloads are not kept
    pub annotations: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationProperty {
    pub name: String,
    /// Qualified association name (v2/v3 only)
    pub relationship: Option<String>,
    pub from_role: Option<String>,
    pub to_role: Option<String>,
    /// `1`, `0..1` or `*`
    pub multiplicity: Option<String>,
    /// Target entity type, `Collection(..)` stripped
    pub target_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntitySet {
    pub name: String,
    pub entity_type: String,
    /// Collection path relative to the service root
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Association {
    pub name: String,
    pub ends: Vec<AssociationEnd>,
    pub referential_constraint: Option<ReferentialConstraint>,
}

impl Association {
    pub fn end(&self, role: &str) -> Option<&AssociationEnd> {
        self.ends.iter().find(|end| end.role == role)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssociationEnd {
    pub role: String,
    #[serde(rename = "type")]
    pub type_name: String,
    pub multiplicity: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferentialConstraint {
    pub principal_role: Option<String>,
    pub dependent_role: Option<String>,
    pub principal_properties: Vec<String>,
    pub dependent_properties: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplexType {
    pub name: String,
    pub fields: Vec<Field>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Field {
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
    pub nullable: bool,
}

/// A function or action.
///
/// `binding_parameter` is the first declared parameter of a bound operation.
/// This follows the CSDL convention and is not checked against the document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    pub name: String,
    pub parameters: Vec<Parameter>,
    pub return_type: Option<String>,
    pub is_bound: bool,
    pub binding_parameter: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Parameter {
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
}
