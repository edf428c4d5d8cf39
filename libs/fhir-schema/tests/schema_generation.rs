//! End-to-end schema generation tests over a small catalog

use galena_catalog::{SearchFieldIndex, TypeCatalog};
use galena_defs::{SearchFieldDescription, TypeDescription};
use galena_schema::{
    IndexMethod, Migration, PlannerConfig, SchemaGenerator, SchemaSnapshot, Statement,
    TableDefinition,
};
use serde_json::{from_value, json, Value};

fn type_descriptions() -> Vec<TypeDescription> {
    let root_elements = |name: &str| -> Vec<Value> {
        vec![
            json!({ "path": format!("{name}.id"), "max": "1", "type": [{ "code": "id" }] }),
            json!({ "path": format!("{name}.meta"), "max": "1", "type": [{ "code": "Meta" }] }),
            json!({ "path": format!("{name}.implicitRules"), "max": "1", "type": [{ "code": "uri" }] }),
            json!({ "path": format!("{name}.language"), "max": "1", "type": [{ "code": "code" }] }),
        ]
    };

    let mut patient = root_elements("Patient");
    patient.extend([
        json!({ "path": "Patient.active", "max": "1", "type": [{ "code": "boolean" }] }),
        json!({ "path": "Patient.birthDate", "max": "1", "type": [{ "code": "date" }] }),
        json!({ "path": "Patient.name", "max": "*", "type": [{ "code": "HumanName" }] }),
        json!({ "path": "Patient.generalPractitioner", "max": "*", "type": [{ "code": "Reference" }] }),
    ]);

    let mut user = root_elements("User");
    user.extend([
        json!({ "path": "User.email", "max": "1", "type": [{ "code": "string" }] }),
    ]);

    let mut communication = root_elements("Communication");
    communication.extend([
        json!({ "path": "Communication.sent", "max": "1", "type": [{ "code": "dateTime" }] }),
        json!({ "path": "Communication.priority", "max": "1", "type": [{ "code": "decimal" }] }),
    ]);

    vec![
        from_value(json!({ "name": "Patient", "elements": patient })).unwrap(),
        from_value(json!({ "name": "User", "elements": user })).unwrap(),
        from_value(json!({ "name": "Communication", "elements": communication })).unwrap(),
        // Declares none of the canonical root fields, so never emitted.
        from_value(json!({
            "name": "HumanName",
            "elements": [
                { "path": "HumanName.family", "max": "1", "type": [{ "code": "string" }] }
            ]
        }))
        .unwrap(),
    ]
}

fn search_fields() -> Vec<SearchFieldDescription> {
    vec![
        field(json!({ "id": "Patient-active", "code": "active", "type": "token", "base": ["Patient"] })),
        field(json!({ "id": "individual-birthdate", "code": "birthdate", "type": "date", "base": ["Patient"] })),
        field(json!({ "id": "individual-name", "code": "name", "type": "string", "base": ["Patient"] })),
        field(json!({ "id": "Patient-identifier", "code": "identifier", "type": "token", "base": ["Patient"] })),
        field(json!({ "id": "individual-address-city", "code": "address-city", "type": "string", "base": ["Patient"] })),
        field(json!({ "id": "Patient-general-practitioner", "code": "generalPractitioner", "type": "reference", "base": ["Patient"] })),
        field(json!({ "id": "User-email", "code": "email", "type": "string", "base": ["User"] })),
        field(json!({ "id": "Communication-sent", "code": "sent", "type": "date", "base": ["Communication"] })),
        field(json!({ "id": "Communication-priority", "code": "priority", "type": "number", "base": ["Communication"] })),
    ]
}

fn field(value: Value) -> SearchFieldDescription {
    from_value(value).unwrap()
}

fn generate(fields: &[SearchFieldDescription], prior: Option<&SchemaSnapshot>) -> Migration {
    let catalog = TypeCatalog::index(&type_descriptions()).unwrap();
    let search = SearchFieldIndex::index(fields);
    SchemaGenerator::new(&catalog, &search, PlannerConfig::default()).emit(prior)
}

fn find_table<'a>(migration: &'a Migration, name: &str) -> &'a TableDefinition {
    migration
        .statements
        .iter()
        .find_map(|s| match s {
            Statement::CreateTable(t) if t.name == name => Some(t),
            _ => None,
        })
        .unwrap_or_else(|| panic!("no CREATE TABLE for {name}"))
}

fn column_type<'a>(table: &'a TableDefinition, column: &str) -> &'a str {
    &table
        .columns
        .iter()
        .find(|c| c.name == column)
        .unwrap_or_else(|| panic!("no column {column} on {}", table.name))
        .sql_type
}

#[test]
fn plans_column_kinds_by_classification() {
    let migration = generate(&search_fields(), None);
    let patient = find_table(&migration, "Patient");

    // Token classification on a scalar boolean property falls back to TEXT;
    // storage kind follows the declared classification, not the property.
    assert_eq!(column_type(patient, "active"), "TEXT");
    assert_eq!(column_type(patient, "birthdate"), "DATE");
    assert_eq!(column_type(patient, "generalPractitioner"), "TEXT[]");

    let communication = find_table(&migration, "Communication");
    assert_eq!(column_type(communication, "sent"), "DATE");
    assert_eq!(column_type(communication, "priority"), "DOUBLE PRECISION");
}

#[test]
fn system_columns_lead_every_resource_table() {
    let migration = generate(&search_fields(), None);
    let patient = find_table(&migration, "Patient");

    let leading: Vec<&str> = patient.columns[..4].iter().map(|c| c.name.as_str()).collect();
    assert_eq!(leading, ["id", "content", "lastUpdated", "compartments"]);
    assert!(patient.columns[0].primary_key);
}

#[test]
fn lookup_fields_produce_no_inline_columns() {
    let migration = generate(&search_fields(), None);
    let patient = find_table(&migration, "Patient");

    assert!(patient.columns.iter().all(|c| c.name != "name"));
    assert!(patient.columns.iter().all(|c| c.name != "identifier"));
    assert!(patient.columns.iter().all(|c| c.name != "address-city"));
}

#[test]
fn lookup_tables_are_emitted_once_with_fixed_columns() {
    let migration = generate(&search_fields(), None);

    for (name, fixed) in [
        ("Address", vec!["line", "city", "country", "postalCode", "state", "use"]),
        ("ContactPoint", vec!["system", "value"]),
        ("Identifier", vec!["system", "value"]),
        ("HumanName", vec!["name", "given", "family"]),
    ] {
        let table = find_table(&migration, name);
        let common: Vec<&str> = table.columns[..4].iter().map(|c| c.name.as_str()).collect();
        assert_eq!(common, ["id", "resourceId", "index", "content"], "{name}");

        let rest: Vec<&str> = table.columns[4..].iter().map(|c| c.name.as_str()).collect();
        assert_eq!(rest, fixed, "{name}");

        let create_count = migration
            .statements
            .iter()
            .filter(|s| matches!(s, Statement::CreateTable(t) if t.name == name))
            .count();
        assert_eq!(create_count, 1, "{name}");
    }
}

#[test]
fn history_tables_carry_no_search_columns() {
    let migration = generate(&search_fields(), None);
    let history = find_table(&migration, "Patient_History");

    let names: Vec<&str> = history.columns.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, ["versionId", "id", "content", "lastUpdated"]);
}

#[test]
fn every_search_column_gets_one_index_gin_iff_array() {
    let migration = generate(&search_fields(), None);

    let index_for = |table: &str, column: &str| {
        migration
            .statements
            .iter()
            .find_map(|s| match s {
                Statement::CreateIndex(i)
                    if i.table == table && i.columns == [column.to_string()] =>
                {
                    Some(i)
                }
                _ => None,
            })
            .unwrap_or_else(|| panic!("no index on {table}.{column}"))
    };

    assert_eq!(index_for("Patient", "birthdate").method, IndexMethod::BTree);
    assert_eq!(
        index_for("Patient", "generalPractitioner").method,
        IndexMethod::Gin
    );
}

#[test]
fn user_identity_column_gets_unique_index() {
    let migration = generate(&search_fields(), None);

    let unique = migration.statements.iter().any(|s| {
        matches!(
            s,
            Statement::CreateIndex(i)
                if i.table == "User" && i.columns == ["email".to_string()] && i.unique
        )
    });
    assert!(unique);
}

#[test]
fn non_resource_types_are_not_emitted() {
    let migration = generate(&search_fields(), None);

    assert!(!migration.snapshot.tables.contains_key("Meta"));
    // HumanName exists as a lookup table but not as a resource table; its
    // lookup shape has a resourceId column, a resource table would not.
    let human_name = find_table(&migration, "HumanName");
    assert!(human_name.columns.iter().any(|c| c.name == "resourceId"));
    assert!(!migration.snapshot.tables.contains_key("HumanName_History"));
}

#[test]
fn regeneration_with_no_changes_is_idempotent() {
    let first = generate(&search_fields(), None);
    let second = generate(&search_fields(), Some(&first.snapshot));

    assert!(second.statements.is_empty());
    assert_eq!(first.snapshot, second.snapshot);
}

#[test]
fn changed_column_kind_emits_alter_with_conversion() {
    let first = generate(&search_fields(), None);

    // The "sent" field is reclassified from date to string between versions.
    let mut changed = search_fields();
    for f in &mut changed {
        if f.code == "sent" {
            *f = field(json!({ "id": "Communication-sent", "code": "sent", "type": "string", "base": ["Communication"] }));
        }
    }
    let second = generate(&changed, Some(&first.snapshot));

    // DATE -> TEXT has no entry in the conversion table: no statement at
    // all for the column, but it stays in the planned schema.
    assert!(second.statements.is_empty());
    assert_eq!(
        second.snapshot.column_type("Communication", "sent"),
        Some("TEXT")
    );

    // TEXT -> DATE converts with a direct cast.
    let third = generate(&search_fields(), Some(&second.snapshot));
    assert_eq!(third.statements.len(), 1);
    match &third.statements[0] {
        Statement::AlterColumnType {
            table,
            column,
            sql_type,
            using,
        } => {
            assert_eq!(table, "Communication");
            assert_eq!(column, "sent");
            assert_eq!(sql_type, "DATE");
            assert_eq!(using.as_deref(), Some("\"sent\"::DATE"));
        }
        other => panic!("expected ALTER COLUMN, got {other:?}"),
    }
}

#[test]
fn new_search_field_adds_column_and_index_to_existing_table() {
    let first = generate(&search_fields(), None);

    let mut extended = search_fields();
    extended.push(field(json!({
        "id": "Patient-death-date",
        "code": "death-date",
        "type": "date",
        "base": ["Patient"]
    })));
    let second = generate(&extended, Some(&first.snapshot));

    assert_eq!(second.statements.len(), 2);
    assert!(matches!(
        &second.statements[0],
        Statement::AddColumn { table, column } if table == "Patient" && column.name == "death-date"
    ));
    assert!(matches!(
        &second.statements[1],
        Statement::CreateIndex(i) if i.table == "Patient" && i.columns == ["death-date".to_string()]
    ));
}

#[test]
fn duplicate_field_codes_collapse_last_write_wins() {
    let mut fields = search_fields();
    fields.push(field(json!({
        "id": "Patient-active-override",
        "code": "active",
        "type": "boolean",
        "base": ["Patient"]
    })));

    let migration = generate(&fields, None);
    let patient = find_table(&migration, "Patient");

    let active_count = patient.columns.iter().filter(|c| c.name == "active").count();
    assert_eq!(active_count, 1);
    assert_eq!(column_type(patient, "active"), "BOOLEAN");
}
