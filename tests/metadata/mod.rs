/// EDMX parsing, version detection and fingerprint tests
///
/// Fixtures cover a v2 document with associations split across two schemas,
/// a v4 document with annotations and bound operations, a legacy document
/// without entity sets, and two schemas declaring the same type name.

pub mod v2;
pub mod v4;

use crate::fixture;
use odata_metadata_sync::metadata::{fingerprint_document, fingerprint_schema};
use odata_metadata_sync::{MetadataError, ODataVersion, analyze_document, detect_version, parse_metadata};

#[test]
fn test_single_entity_round_trip() {
    let doc = r#"<?xml version="1.0" encoding="utf-8"?>
<edmx:Edmx Version="4.0" xmlns:edmx="http://docs.oasis-open.org/odata/ns/edmx">
  <edmx:DataServices>
    <Schema Namespace="Shop" xmlns="http://docs.oasis-open.org/odata/ns/edm">
      <EntityType Name="Item">
        <Key><PropertyRef Name="ID"/></Key>
        <Property Name="ID" Type="Edm.Int32" Nullable="false"/>
        <Property Name="label" Type="Edm.String"/>
      </EntityType>
      <EntityContainer Name="Container">
        <EntitySet Name="Items" EntityType="Shop.Item"/>
      </EntityContainer>
    </Schema>
  </edmx:DataServices>
</edmx:Edmx>"#;

    let schema = parse_metadata(doc).unwrap();

    assert_eq!(schema.entities.len(), 1);
    let item = &schema.entities[0];
    assert_eq!(item.keys, vec!["ID"]);
    assert_eq!(item.properties.len(), 2);
    assert_eq!(item.properties[0].name, "ID");
    assert_eq!(item.properties[1].name, "label");
    assert!(!item.properties[0].nullable);
    assert!(item.properties[1].nullable);
    assert_eq!(schema.entity_set("Items").unwrap().entity_type, "Shop.Item");
}

#[test]
fn test_legacy_document_gets_synthetic_entity_sets() {
    let schema = parse_metadata(&fixture("legacy_no_sets.xml")).unwrap();

    assert_eq!(schema.entities.len(), 1);
    assert_eq!(schema.entity_sets.len(), 1);

    let set = &schema.entity_sets[0];
    assert_eq!(set.name, "Customer");
    assert_eq!(set.entity_type, "Legacy.Customer");
    assert_eq!(set.url, "Customer");
}

#[test]
fn test_duplicate_names_across_schemas_are_kept() {
    let schema = parse_metadata(&fixture("duplicate_names.xml")).unwrap();

    assert_eq!(schema.namespaces, vec!["Sales", "Purchasing"]);
    let names: Vec<&str> = schema.entities.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["Order", "Order"]);
    assert_eq!(schema.entities[1].keys, vec!["OrderNo", "Year"]);

    // A declared set exists, so nothing is synthesized for the second Order
    assert_eq!(schema.entity_sets.len(), 1);
    assert_eq!(schema.entity_sets[0].name, "Orders");
}

#[test]
fn test_lowercase_edmx_elements_are_accepted() {
    let doc = r#"<edmx:edmx Version="4.0" xmlns:edmx="http://docs.oasis-open.org/odata/ns/edmx">
  <edmx:dataservices>
    <Schema Namespace="X" xmlns="http://docs.oasis-open.org/odata/ns/edm">
      <EntityType Name="A"/>
    </Schema>
  </edmx:dataservices>
</edmx:edmx>"#;

    let schema = parse_metadata(doc).unwrap();
    assert_eq!(schema.entities[0].name, "A");
    assert!(schema.entities[0].keys.is_empty());
    assert_eq!(detect_version(doc), ODataVersion::V4);
}

#[test]
fn test_serialized_keys() {
    let schema = parse_metadata(&fixture("catalog_v4.xml")).unwrap();
    let value = serde_json::to_value(&schema).unwrap();

    for key in ["entities", "entitySets", "associations", "complexTypes", "functions", "actions"] {
        assert!(value[key].is_array(), "missing array for key {}", key);
    }

    let title = &value["entities"][0]["properties"][1];
    assert_eq!(title["name"], "title");
    assert_eq!(title["type"], "Edm.String");
    assert_eq!(title["maxLength"], 111);
    assert_eq!(value["entities"][0]["navigationProperties"][0]["targetType"], "CatalogService.Authors");
}

#[test]
fn test_fixture_versions() {
    assert_eq!(detect_version(&fixture("northwind_v2.xml")), ODataVersion::V2);
    assert_eq!(detect_version(&fixture("catalog_v4.xml")), ODataVersion::V4);
    assert_eq!(detect_version(&fixture("legacy_no_sets.xml")), ODataVersion::V2);
}

#[test]
fn test_fingerprints_over_fixtures() {
    let doc = fixture("catalog_v4.xml");
    assert_eq!(fingerprint_document(&doc), fingerprint_document(&doc.clone()));

    let reformatted = doc.replace("  ", "\t");
    assert_ne!(fingerprint_document(&doc), fingerprint_document(&reformatted));

    // Whitespace changes leave the normalized form alone
    let a = fingerprint_schema(&parse_metadata(&doc).unwrap()).unwrap();
    let b = fingerprint_schema(&parse_metadata(&reformatted).unwrap()).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_analyze_document() {
    let doc = fixture("northwind_v2.xml");
    let snapshot = analyze_document(&doc).unwrap();

    assert_eq!(snapshot.version, ODataVersion::V2);
    assert_eq!(snapshot.fingerprint, fingerprint_document(&doc));
    assert_eq!(snapshot.schema.entities.len(), 2);

    let err = analyze_document("<html><body>Sign in</body></html>").unwrap_err();
    assert!(matches!(err, MetadataError::UnsupportedShape { .. }));
}
