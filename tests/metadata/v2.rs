use crate::fixture;
use odata_metadata_sync::NormalizedSchema;
use odata_metadata_sync::parse_metadata;

fn northwind() -> NormalizedSchema {
    parse_metadata(&fixture("northwind_v2.xml")).unwrap()
}

#[test]
fn test_entity_types_and_properties() {
    let schema = northwind();
    assert_eq!(schema.namespaces, vec!["NorthwindModel", "ODataWeb.Northwind.Model"]);
    assert_eq!(schema.entities.len(), 2);

    let category = schema.entity("Category").unwrap();
    assert_eq!(category.keys, vec!["CategoryID"]);

    let names: Vec<&str> = category.properties.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["CategoryID", "CategoryName", "Description"]);

    let category_name = &category.properties[1];
    assert_eq!(category_name.type_name, "Edm.String");
    assert!(!category_name.nullable);
    assert_eq!(category_name.max_length, Some(15));

    // MaxLength="Max" is unbounded
    assert_eq!(category.properties[2].max_length, None);
    assert!(category.properties[2].nullable);
    assert!(category.properties[2].annotations.is_empty());
}

#[test]
fn test_navigation_properties_resolve_through_associations() {
    let schema = northwind();

    let products = &schema.entity("Category").unwrap().navigation_properties[0];
    assert_eq!(products.name, "Products");
    assert_eq!(products.relationship.as_deref(), Some("NorthwindModel.FK_Products_Categories"));
    assert_eq!(products.from_role.as_deref(), Some("Categories"));
    assert_eq!(products.to_role.as_deref(), Some("Products"));
    assert_eq!(products.multiplicity.as_deref(), Some("*"));
    assert_eq!(products.target_type.as_deref(), Some("NorthwindModel.Product"));

    let category = &schema.entity("Product").unwrap().navigation_properties[0];
    assert_eq!(category.multiplicity.as_deref(), Some("0..1"));
    assert_eq!(category.target_type.as_deref(), Some("NorthwindModel.Category"));
}

#[test]
fn test_associations() {
    let schema = northwind();
    assert_eq!(schema.associations.len(), 1);

    let association = &schema.associations[0];
    assert_eq!(association.name, "FK_Products_Categories");
    assert_eq!(association.ends.len(), 2);
    assert_eq!(association.ends[0].role, "Categories");
    assert_eq!(association.ends[0].type_name, "NorthwindModel.Category");
    assert_eq!(association.ends[1].multiplicity, "*");

    let constraint = association.referential_constraint.as_ref().unwrap();
    assert_eq!(constraint.principal_role.as_deref(), Some("Categories"));
    assert_eq!(constraint.dependent_role.as_deref(), Some("Products"));
    assert_eq!(constraint.principal_properties, vec!["CategoryID"]);
    assert_eq!(constraint.dependent_properties, vec!["CategoryID"]);
}

#[test]
fn test_container_in_second_schema() {
    let schema = northwind();

    let names: Vec<&str> = schema.entity_sets.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["Categories", "Products"]);
    assert_eq!(schema.entity_sets[1].entity_type, "NorthwindModel.Product");
    assert_eq!(schema.entity_sets[1].url, "Products");
}

#[test]
fn test_complex_types() {
    let schema = northwind();
    assert_eq!(schema.complex_types.len(), 1);

    let address = &schema.complex_types[0];
    assert_eq!(address.name, "Address");
    assert_eq!(address.fields.len(), 2);
    assert!(address.fields[0].nullable);
    assert!(!address.fields[1].nullable);
}

#[test]
fn test_legacy_function_import_becomes_function() {
    let schema = northwind();
    assert!(schema.actions.is_empty());
    assert_eq!(schema.functions.len(), 1);

    let top = &schema.functions[0];
    assert_eq!(top.name, "TopProducts");
    assert_eq!(top.return_type.as_deref(), Some("Collection(NorthwindModel.Product)"));
    assert_eq!(top.parameters.len(), 1);
    assert_eq!(top.parameters[0].name, "count");
    assert_eq!(top.parameters[0].type_name, "Edm.Int32");
    assert!(!top.is_bound);
    assert_eq!(top.binding_parameter, None);
}

#[test]
fn test_only_first_referential_constraint_is_kept() {
    let doc = r#"<edmx:Edmx Version="1.0" xmlns:edmx="http://schemas.microsoft.com/ado/2007/06/edmx">
  <edmx:DataServices>
    <Schema Namespace="Orders" xmlns="http://schemas.microsoft.com/ado/2008/09/edm">
      <Association Name="Order_Customer">
        <End Role="Customer" Type="Orders.Customer" Multiplicity="1" />
        <End Role="Order" Type="Orders.Order" Multiplicity="*" />
        <ReferentialConstraint>
          <Principal Role="Customer">
            <PropertyRef Name="CustomerID" />
            <PropertyRef Name="Region" />
          </Principal>
          <Dependent Role="Order">
            <PropertyRef Name="CustomerRef" />
            <PropertyRef Name="RegionRef" />
          </Dependent>
        </ReferentialConstraint>
        <ReferentialConstraint>
          <Principal Role="Order">
            <PropertyRef Name="OrderID" />
          </Principal>
          <Dependent Role="Customer">
            <PropertyRef Name="LastOrderID" />
          </Dependent>
        </ReferentialConstraint>
      </Association>
    </Schema>
  </edmx:DataServices>
</edmx:Edmx>"#;

    let schema = parse_metadata(doc).unwrap();
    let constraint = schema.associations[0].referential_constraint.as_ref().unwrap();

    assert_eq!(constraint.principal_role.as_deref(), Some("Customer"));
    assert_eq!(constraint.dependent_role.as_deref(), Some("Order"));
    assert_eq!(constraint.principal_properties, vec!["CustomerID", "Region"]);
    assert_eq!(constraint.dependent_properties, vec!["CustomerRef", "RegionRef"]);
}
