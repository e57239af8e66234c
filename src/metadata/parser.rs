//! EDMX/CSDL parsing into a `NormalizedSchema`

use super::models::{
    Association, AssociationEnd, ComplexType, EntitySet, EntityType, Field, NavigationProperty,
    NormalizedSchema, Operation, Parameter, Property, ReferentialConstraint,
};
use crate::error::MetadataError;
use log::{debug, info};
use roxmltree::{Document, Node};
use std::collections::HashMap;

/// Parse an EDMX document (v2, v3 or v4) into a normalized schema.
///
/// Fails with `MalformedDocument` when the input is not well-formed XML, and
/// with `UnsupportedShape` when there is no `Edmx` root or no `DataServices`
/// container. A container without schemas is a valid, empty result.
pub fn parse_metadata(raw: &str) -> Result<NormalizedSchema, MetadataError> {
    info!("Starting metadata XML parsing, XML length: {} bytes", raw.len());

    let doc = Document::parse(raw).map_err(|e| MetadataError::malformed(e.to_string()))?;
    let root = doc.root_element();

    if !root.tag_name().name().eq_ignore_ascii_case("Edmx") {
        return Err(MetadataError::unsupported(format!(
            "root element is <{}>, expected Edmx",
            root.tag_name().name()
        )));
    }

    let data_services = root
        .children()
        .find(|n| n.is_element() && n.tag_name().name().eq_ignore_ascii_case("DataServices"))
        .ok_or_else(|| MetadataError::unsupported("Edmx root has no DataServices element"))?;

    let schemas: Vec<SchemaBlock> = data_services
        .children()
        .filter(|n| is_element(n, "Schema"))
        .map(SchemaBlock::new)
        .collect();

    debug!("Found {} schema block(s)", schemas.len());

    let mut result = NormalizedSchema {
        namespaces: schemas.iter().map(|s| s.namespace.to_string()).collect(),
        ..NormalizedSchema::default()
    };

    // Associations first so navigation properties can resolve their ends
    let mut association_index: HashMap<String, usize> = HashMap::new();
    for schema in &schemas {
        for node in schema.node.children().filter(|n| is_element(n, "Association")) {
            let Some(association) = parse_association(node) else {
                continue;
            };
            for qualified in schema.qualify(&association.name) {
                association_index
                    .entry(qualified)
                    .or_insert(result.associations.len());
            }
            result.associations.push(association);
        }
    }

    let mut qualified_entity_names = Vec::new();
    for schema in &schemas {
        for node in schema.node.children().filter(|n| n.is_element()) {
            match node.tag_name().name() {
                "EntityType" => {
                    if let Some(entity) =
                        parse_entity_type(node, &result.associations, &association_index)
                    {
                        qualified_entity_names.push(schema.qualified_name(&entity.name));
                        result.entities.push(entity);
                    }
                }
                "ComplexType" => result.complex_types.extend(parse_complex_type(node)),
                "Function" => result.functions.extend(parse_operation(node)),
                "Action" => result.actions.extend(parse_operation(node)),
                "EntityContainer" => parse_container(node, &mut result),
                _ => {}
            }
        }
    }

    if result.entity_sets.is_empty() && !result.entities.is_empty() {
        debug!(
            "No entity sets declared, synthesizing {} from entity types",
            result.entities.len()
        );
        result.entity_sets = result
            .entities
            .iter()
            .zip(qualified_entity_names)
            .map(|(entity, qualified)| EntitySet {
                name: entity.name.clone(),
                entity_type: qualified,
                url: entity.name.clone(),
            })
            .collect();
    }

    info!(
        "Parsed metadata: {} entities, {} entity sets, {} associations, {} complex types, {} functions, {} actions",
        result.entities.len(),
        result.entity_sets.len(),
        result.associations.len(),
        result.complex_types.len(),
        result.functions.len(),
        result.actions.len()
    );

    Ok(result)
}

struct SchemaBlock<'a, 'input> {
    node: Node<'a, 'input>,
    namespace: &'a str,
    alias: Option<&'a str>,
}

impl<'a, 'input> SchemaBlock<'a, 'input> {
    fn new(node: Node<'a, 'input>) -> Self {
        Self {
            node,
            namespace: node.attribute("Namespace").unwrap_or(""),
            alias: node.attribute("Alias"),
        }
    }

    fn qualified_name(&self, name: &str) -> String {
        if self.namespace.is_empty() {
            name.to_string()
        } else {
            format!("{}.{}", self.namespace, name)
        }
    }

    /// Every name a `Relationship` attribute may use to refer to `name`
    fn qualify(&self, name: &str) -> Vec<String> {
        let mut names = vec![self.qualified_name(name)];
        if let Some(alias) = self.alias {
            names.push(format!("{}.{}", alias, name));
        }
        names
    }
}

fn is_element(node: &Node, name: &str) -> bool {
    node.is_element() && node.tag_name().name() == name
}

fn named<'a>(node: Node<'a, '_>, kind: &str) -> Option<&'a str> {
    let name = node.attribute("Name");
    if name.is_none() {
        debug!("Skipping {} without a Name attribute", kind);
    }
    name
}

fn nullable(node: Node) -> bool {
    node.attribute("Nullable") != Some("false")
}

fn strip_collection(type_name: &str) -> &str {
    type_name
        .strip_prefix("Collection(")
        .and_then(|inner| inner.strip_suffix(')'))
        .unwrap_or(type_name)
}

fn parse_entity_type(
    node: Node,
    associations: &[Association],
    association_index: &HashMap<String, usize>,
) -> Option<EntityType> {
    let name = named(node, "EntityType")?;

    let keys = node
        .children()
        .filter(|n| is_element(n, "Key"))
        .take(1)
        .flat_map(|key| key.children().filter(|n| is_element(n, "PropertyRef")))
        .filter_map(|r| r.attribute("Name").map(str::to_string))
        .collect();

    let properties = node
        .children()
        .filter(|n| is_element(n, "Property"))
        .filter_map(parse_property)
        .collect();

    let navigation_properties = node
        .children()
        .filter(|n| is_element(n, "NavigationProperty"))
        .filter_map(|n| parse_navigation_property(n, associations, association_index))
        .collect();

    Some(EntityType {
        name: name.to_string(),
        keys,
        properties,
        navigation_properties,
    })
}

fn parse_property(node: Node) -> Option<Property> {
    let name = named(node, "Property")?;

    let annotations = node
        .children()
        .filter(|n| is_element(n, "Annotation"))
        .filter_map(|n| n.attribute("Term"))
        .filter(|term| !term.is_empty())
        .map(str::to_string)
        .collect();

    Some(Property {
        name: name.to_string(),
        type_name: node.attribute("Type").unwrap_or_default().to_string(),
        nullable: nullable(node),
        max_length: node.attribute("MaxLength").and_then(|v| v.parse().ok()),
        annotations,
    })
}

fn parse_navigation_property(
    node: Node,
    associations: &[Association],
    association_index: &HashMap<String, usize>,
) -> Option<NavigationProperty> {
    let name = named(node, "NavigationProperty")?;
    let relationship = node.attribute("Relationship");
    let to_role = node.attribute("ToRole");

    let (multiplicity, target_type) = match node.attribute("Type") {
        // v4: the type itself carries cardinality
        Some(type_name) => {
            let multiplicity = if type_name.starts_with("Collection(") {
                "*"
            } else if nullable(node) {
                "0..1"
            } else {
                "1"
            };
            (
                Some(multiplicity.to_string()),
                Some(strip_collection(type_name).to_string()),
            )
        }
        // v2/v3: look at the association end we navigate to
        None => {
            let end = relationship
                .zip(to_role)
                .and_then(|(rel, role)| {
                    association_index
                        .get(rel)
                        .and_then(|&i| associations[i].end(role))
                });
            if end.is_none() {
                debug!(
                    "Navigation property {} does not resolve to an association end",
                    name
                );
            }
            (
                end.map(|e| e.multiplicity.clone()),
                end.map(|e| e.type_name.clone()),
            )
        }
    };

    Some(NavigationProperty {
        name: name.to_string(),
        relationship: relationship.map(str::to_string),
        from_role: node.attribute("FromRole").map(str::to_string),
        to_role: to_role.map(str::to_string),
        multiplicity,
        target_type,
    })
}

fn parse_association(node: Node) -> Option<Association> {
    let name = named(node, "Association")?;

    let ends = node
        .children()
        .filter(|n| is_element(n, "End"))
        .map(|end| AssociationEnd {
            role: end.attribute("Role").unwrap_or_default().to_string(),
            type_name: end.attribute("Type").unwrap_or_default().to_string(),
            multiplicity: end.attribute("Multiplicity").unwrap_or_default().to_string(),
        })
        .collect();

    // Only the first constraint is meaningful; principal/dependent by position
    let referential_constraint = node
        .children()
        .find(|n| is_element(n, "ReferentialConstraint"))
        .map(|rc| {
            let principal = rc.children().find(|n| is_element(n, "Principal"));
            let dependent = rc.children().find(|n| is_element(n, "Dependent"));
            ReferentialConstraint {
                principal_role: role_of(principal),
                dependent_role: role_of(dependent),
                principal_properties: property_refs(principal),
                dependent_properties: property_refs(dependent),
            }
        });

    Some(Association {
        name: name.to_string(),
        ends,
        referential_constraint,
    })
}

fn role_of(node: Option<Node>) -> Option<String> {
    node.and_then(|n| n.attribute("Role")).map(str::to_string)
}

fn property_refs(node: Option<Node>) -> Vec<String> {
    node.map(|n| {
        n.children()
            .filter(|c| is_element(c, "PropertyRef"))
            .filter_map(|c| c.attribute("Name").map(str::to_string))
            .collect()
    })
    .unwrap_or_default()
}

fn parse_complex_type(node: Node) -> Option<ComplexType> {
    let name = named(node, "ComplexType")?;

    let fields = node
        .children()
        .filter(|n| is_element(n, "Property"))
        .filter_map(|p| {
            Some(Field {
                name: named(p, "Property")?.to_string(),
                type_name: p.attribute("Type").unwrap_or_default().to_string(),
                nullable: nullable(p),
            })
        })
        .collect();

    Some(ComplexType {
        name: name.to_string(),
        fields,
    })
}

fn parse_parameters(node: Node) -> Vec<Parameter> {
    node.children()
        .filter(|n| is_element(n, "Parameter"))
        .filter_map(|p| {
            Some(Parameter {
                name: named(p, "Parameter")?.to_string(),
                type_name: p.attribute("Type").unwrap_or_default().to_string(),
            })
        })
        .collect()
}

/// Function or Action element (v3 and v4 shapes)
fn parse_operation(node: Node) -> Option<Operation> {
    let name = named(node, node.tag_name().name())?;
    let parameters = parse_parameters(node);

    let return_type = node
        .children()
        .find(|n| is_element(n, "ReturnType"))
        .and_then(|r| r.attribute("Type"))
        .or_else(|| node.attribute("ReturnType"))
        .map(str::to_string);

    let is_bound = node.attribute("IsBound") == Some("true");
    let binding_parameter = if is_bound {
        parameters.first().map(|p| p.name.clone())
    } else {
        None
    };

    Some(Operation {
        name: name.to_string(),
        parameters,
        return_type,
        is_bound,
        binding_parameter,
    })
}

fn parse_container(node: Node, result: &mut NormalizedSchema) {
    for child in node.children().filter(|n| n.is_element()) {
        match child.tag_name().name() {
            "EntitySet" => {
                if let Some(name) = named(child, "EntitySet") {
                    result.entity_sets.push(EntitySet {
                        name: name.to_string(),
                        entity_type: child.attribute("EntityType").unwrap_or_default().to_string(),
                        url: name.to_string(),
                    });
                }
            }
            // v4 imports point at a Function/Action declared elsewhere in the schema
            "FunctionImport"
                if child.attribute("Function").is_none() && child.attribute("Action").is_none() =>
            {
                result.functions.extend(parse_operation(child));
            }
            _ => {}
        }
    }
}
