use crate::fixture;
use odata_metadata_sync::NormalizedSchema;
use odata_metadata_sync::parse_metadata;

fn catalog() -> NormalizedSchema {
    parse_metadata(&fixture("catalog_v4.xml")).unwrap()
}

#[test]
fn test_annotation_terms() {
    let schema = catalog();
    let books = schema.entity("Books").unwrap();

    let title = &books.properties[1];
    assert_eq!(title.name, "title");
    assert_eq!(title.max_length, Some(111));
    // The annotation without a Term is dropped
    assert_eq!(title.annotations, vec!["Core.Description", "Common.Label"]);

    let authors = schema.entity("Authors").unwrap();
    assert_eq!(authors.properties[1].max_length, None);
}

#[test]
fn test_navigation_multiplicity_from_type() {
    let schema = catalog();
    let navs = &schema.entity("Books").unwrap().navigation_properties;
    assert_eq!(navs.len(), 3);

    assert_eq!(navs[0].name, "author");
    assert_eq!(navs[0].multiplicity.as_deref(), Some("1"));
    assert_eq!(navs[0].target_type.as_deref(), Some("CatalogService.Authors"));
    assert_eq!(navs[0].relationship, None);

    assert_eq!(navs[1].multiplicity.as_deref(), Some("*"));
    assert_eq!(navs[1].target_type.as_deref(), Some("CatalogService.Reviews"));

    assert_eq!(navs[2].multiplicity.as_deref(), Some("0..1"));
}

#[test]
fn test_functions() {
    let schema = catalog();

    // The FunctionImport in the container refers to topSellers and is not repeated
    let names: Vec<&str> = schema.functions.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["topSellers", "averageRating"]);

    let top = &schema.functions[0];
    assert!(!top.is_bound);
    assert_eq!(top.binding_parameter, None);
    assert_eq!(top.return_type.as_deref(), Some("Collection(CatalogService.Books)"));

    let rating = &schema.functions[1];
    assert!(rating.is_bound);
    assert_eq!(rating.binding_parameter.as_deref(), Some("in"));
    assert_eq!(rating.return_type.as_deref(), Some("Edm.Decimal"));
}

#[test]
fn test_actions() {
    let schema = catalog();
    assert_eq!(schema.actions.len(), 2);

    let submit = &schema.actions[0];
    assert_eq!(submit.name, "submitOrder");
    assert_eq!(submit.return_type, None);
    assert!(!submit.is_bound);
    let params: Vec<&str> = submit.parameters.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(params, vec!["book", "quantity"]);

    let restock = &schema.actions[1];
    assert!(restock.is_bound);
    assert_eq!(restock.binding_parameter.as_deref(), Some("in"));
    assert_eq!(restock.parameters[1].name, "amount");
    assert_eq!(restock.return_type.as_deref(), Some("CatalogService.Books"));
}

#[test]
fn test_entity_sets_and_complex_types() {
    let schema = catalog();

    assert_eq!(schema.entity_sets.len(), 2);
    assert_eq!(schema.entity_set("Books").unwrap().entity_type, "CatalogService.Books");
    assert!(schema.associations.is_empty());

    let price = &schema.complex_types[0];
    assert_eq!(price.name, "Price");
    assert_eq!(price.fields[0].type_name, "Edm.Decimal");
    assert!(!price.fields[0].nullable);
}
