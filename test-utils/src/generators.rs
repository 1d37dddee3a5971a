//! Shared proptest generators for vip-core payloads.

use proptest::prelude::*;

/// Error codes the service is known to answer with.
pub const KNOWN_ERROR_CODES: [&str; 7] = [
    "authentication_error",
    "service_unavailable",
    "agency_not_found",
    "error_in_request",
    "no_agencies_found",
    "no_userid_selected",
    "profile_not_found",
];

/// Generate six digit agency ids.
pub fn agency_id_strategy() -> impl Strategy<Value = String> {
    "[0-9]{6}"
}

/// Generate rule names in the service's snake case form.
pub fn rule_name_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("create_enrichments".to_string()),
        Just("use_enrichments".to_string()),
        Just("auth_root".to_string()),
        Just("cataloging_template_set".to_string()),
        "[a-z]{3,10}(_[a-z]{2,10}){0,3}",
    ]
}

/// Generate rule values as the JSON a search would send.
pub fn rule_value_strategy() -> impl Strategy<Value = serde_json::Value> {
    prop_oneof![
        any::<bool>().prop_map(serde_json::Value::from),
        "[a-z]{1,8}".prop_map(serde_json::Value::from),
    ]
}

/// Generate one of the known error codes.
pub fn known_error_code_strategy() -> impl Strategy<Value = String> {
    proptest::sample::select(KNOWN_ERROR_CODES.to_vec()).prop_map(str::to_string)
}

/// Generate error codes outside the known set.
pub fn unknown_error_code_strategy() -> impl Strategy<Value = String> {
    "[a-z]{3,12}(_[a-z]{3,8})?".prop_filter("must not be a known code", |code| {
        !KNOWN_ERROR_CODES.contains(&code.as_str())
    })
}

/// Generate ASCII strings together with a differently cased copy.
pub fn case_variant_strategy() -> impl Strategy<Value = (String, String)> {
    "[a-z_]{1,24}".prop_flat_map(|original| {
        let len = original.len();
        (Just(original), proptest::collection::vec(any::<bool>(), len))
            .prop_map(|(original, upper)| {
                let variant: String = original
                    .chars()
                    .zip(upper)
                    .map(|(c, up)| if up { c.to_ascii_uppercase() } else { c })
                    .collect();
                (original, variant)
            })
    })
}
