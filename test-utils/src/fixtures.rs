//! Sample vip-core payloads.
//!
//! Agency `010100` is a national agency that creates enrichments; `710100`
//! is a public library that uses them.

use serde_json::{Value, json};

/// Rule set of agency `010100`.
#[must_use]
pub fn rule_set_010100() -> Value {
    json!({
        "agencyId": "010100",
        "agencyType": "Other",
        "libraryRule": [
            {"name": "create_enrichments", "bool": true},
            {"name": "part_of_danbib", "bool": true},
            {"name": "use_enrichments", "bool": false},
            {"name": "auth_root", "bool": true},
            {"name": "auth_common_subjects", "bool": true},
            {"name": "cataloging_template_set", "string": "dbc"}
        ]
    })
}

/// Rule set of agency `710100`.
#[must_use]
pub fn rule_set_710100() -> Value {
    json!({
        "agencyId": "710100",
        "agencyType": "Folkebibliotek",
        "libraryRule": [
            {"name": "create_enrichments", "bool": false},
            {"name": "part_of_bibliotek_dk", "bool": true},
            {"name": "use_enrichments", "bool": true},
            {"name": "auth_root", "bool": false},
            {"name": "cataloging_template_set", "string": "fbs"}
        ]
    })
}

/// A `libraryrules` response holding the given rule sets.
#[must_use]
pub fn library_rules_response(rule_sets: &[Value]) -> Value {
    json!({ "libraryRules": rule_sets })
}

/// An agency search response listing the given agencies.
#[must_use]
pub fn agency_search_response(agency_ids: &[&str]) -> Value {
    let rule_sets: Vec<Value> = agency_ids
        .iter()
        .map(|agency_id| json!({"agencyId": agency_id, "libraryRule": []}))
        .collect();
    library_rules_response(&rule_sets)
}

/// A `libraryrules` response without any rule sets.
#[must_use]
pub fn empty_library_rules_response() -> Value {
    json!({ "trackingId": "fixture" })
}

/// Information record of agency `010100`.
#[must_use]
pub fn information_010100() -> Value {
    json!({
        "agencyId": "010100",
        "agencyName": "DBC",
        "agencyType": "Andet",
        "branchId": "010100",
        "branchName": {"value": "DBC Digital", "language": "dan"},
        "branchPhone": "44867711",
        "branchEmail": "kundeservice@dbc.dk",
        "branchType": "h",
        "postalAddress": "Tempovej 7-11",
        "postalCode": "2750",
        "city": "Ballerup",
        "isil": "DK-010100",
        "requestOrder": "1",
        "replyToEmail": "kundeservice@dbc.dk"
    })
}

/// A `service` response wrapping an information record.
#[must_use]
pub fn service_response(information: Value) -> Value {
    json!({ "information": information })
}

/// The error envelope for `code`.
#[must_use]
pub fn error_body(code: &str) -> Value {
    json!({ "error": code })
}
