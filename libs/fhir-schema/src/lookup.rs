//! Lookup-table classification
//!
//! Certain composite field kinds (postal address, contact point, identifier,
//! person name) are structured, repeatable, and independently indexable, so
//! they live in one shared side table per kind instead of an inline column
//! on the owning resource table.
//!
//! Classification is a fixed list of (kind, predicate) rules evaluated in
//! priority order; adding a composite kind means adding one rule and one
//! column list here.

use galena_defs::{SearchFieldDescription, SearchFieldKind};

/// The four composite kinds stored in shared lookup tables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LookupKind {
    Address,
    ContactPoint,
    Identifier,
    PersonName,
}

impl LookupKind {
    /// All kinds, in table-emission order
    pub const ALL: [LookupKind; 4] = [
        LookupKind::Address,
        LookupKind::ContactPoint,
        LookupKind::Identifier,
        LookupKind::PersonName,
    ];

    /// Physical table name of the shared lookup table
    pub fn table_name(&self) -> &'static str {
        match self {
            LookupKind::Address => "Address",
            LookupKind::ContactPoint => "ContactPoint",
            LookupKind::Identifier => "Identifier",
            LookupKind::PersonName => "HumanName",
        }
    }

    /// Fixed value columns of the lookup table, beyond the common
    /// id/resourceId/index/content columns every kind carries.
    pub fn value_columns(&self) -> &'static [&'static str] {
        match self {
            LookupKind::Address => &["line", "city", "country", "postalCode", "state", "use"],
            LookupKind::ContactPoint => &["system", "value"],
            LookupKind::Identifier => &["system", "value"],
            LookupKind::PersonName => &["name", "given", "family"],
        }
    }
}

struct ClassificationRule {
    kind: LookupKind,
    applies: fn(&SearchFieldDescription) -> bool,
}

/// Rules in priority order; the first match wins. The broad address-prefix
/// rule deliberately comes last.
const RULES: [ClassificationRule; 4] = [
    ClassificationRule {
        kind: LookupKind::Identifier,
        applies: is_identifier_field,
    },
    ClassificationRule {
        kind: LookupKind::PersonName,
        applies: is_person_name_field,
    },
    ClassificationRule {
        kind: LookupKind::ContactPoint,
        applies: is_contact_point_field,
    },
    ClassificationRule {
        kind: LookupKind::Address,
        applies: is_address_field,
    },
];

const PERSON_NAME_FIELDS: [&str; 6] = [
    "individual-name",
    "individual-phonetic",
    "Patient-name",
    "Person-name",
    "Practitioner-name",
    "RelatedPerson-name",
];

const CONTACT_POINT_FIELDS: [&str; 6] = [
    "individual-telecom",
    "individual-email",
    "individual-phone",
    "OrganizationAffiliation-telecom",
    "OrganizationAffiliation-email",
    "OrganizationAffiliation-phone",
];

const ADDRESS_FIELDS: [&str; 4] = [
    "individual-address",
    "InsurancePlan-address",
    "Location-address",
    "Organization-address",
];

const ADDRESS_PREFIX: &str = "address-";

/// Decide lookup-table membership for a search field.
///
/// Returns the owning kind, or None when the field stays an inline column.
pub fn classify(field: &SearchFieldDescription) -> Option<LookupKind> {
    RULES
        .iter()
        .find(|rule| (rule.applies)(field))
        .map(|rule| rule.kind)
}

fn is_identifier_field(field: &SearchFieldDescription) -> bool {
    field.code == "identifier" && field.kind == SearchFieldKind::Token
}

fn is_person_name_field(field: &SearchFieldDescription) -> bool {
    PERSON_NAME_FIELDS.contains(&field.identity())
}

fn is_contact_point_field(field: &SearchFieldDescription) -> bool {
    CONTACT_POINT_FIELDS.contains(&field.identity())
}

fn is_address_field(field: &SearchFieldDescription) -> bool {
    ADDRESS_FIELDS.contains(&field.identity()) || field.code.starts_with(ADDRESS_PREFIX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{from_value, json};

    fn field(id: &str, code: &str, kind: &str) -> SearchFieldDescription {
        from_value(json!({ "id": id, "code": code, "type": kind, "base": ["Patient"] })).unwrap()
    }

    #[test]
    fn identifier_token_goes_to_identifier_table() {
        let f = field("Patient-identifier", "identifier", "token");
        assert_eq!(classify(&f), Some(LookupKind::Identifier));
    }

    #[test]
    fn identifier_code_of_other_kind_stays_inline() {
        let f = field("Some-identifier", "identifier", "string");
        assert_eq!(classify(&f), None);
    }

    #[test]
    fn enumerated_name_fields_go_to_human_name_table() {
        for id in PERSON_NAME_FIELDS {
            let f = field(id, "name", "string");
            assert_eq!(classify(&f), Some(LookupKind::PersonName), "{id}");
        }
    }

    #[test]
    fn telecom_triples_go_to_contact_point_table() {
        let f = field("individual-email", "email", "token");
        assert_eq!(classify(&f), Some(LookupKind::ContactPoint));

        let f = field("OrganizationAffiliation-phone", "phone", "token");
        assert_eq!(classify(&f), Some(LookupKind::ContactPoint));
    }

    #[test]
    fn address_prefix_rule_covers_sub_components() {
        for code in ["address-city", "address-state", "address-postalcode"] {
            let f = field(code, code, "string");
            assert_eq!(classify(&f), Some(LookupKind::Address), "{code}");
        }
    }

    #[test]
    fn unrelated_fields_stay_inline() {
        let f = field("Patient-birthdate", "birthdate", "date");
        assert_eq!(classify(&f), None);
    }
}
