//! Property-based tests for vipcore-client.

use proptest::prelude::*;
use reqwest::StatusCode;
use serde_json::json;
use std::collections::HashSet;
use std::time::Duration;
use test_utils::{
    VipCoreMock, agency_id_strategy, case_variant_strategy, fixtures, known_error_code_strategy,
    rule_name_strategy, rule_value_strategy, unknown_error_code_strategy,
};
use vipcore_client::{
    ApplicationError, LibraryRule, LibraryRuleSet, LibraryRulesClient, RawResponse, RuleValue,
    VipCoreConfig, VipCoreError, read_response,
};

fn error_response(status: u16, code: &str) -> RawResponse {
    RawResponse::new(
        StatusCode::from_u16(status).unwrap(),
        json!({ "error": code }).to_string().into_bytes(),
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_known_codes_map_to_their_variant(
        code in known_error_code_strategy(),
        status in prop_oneof![Just(400_u16), Just(403), Just(404), Just(503)]
    ) {
        let result =
            read_response::<LibraryRuleSet>(&error_response(status, &code), StatusCode::OK);

        match result {
            Err(VipCoreError::Application(err)) => {
                prop_assert!(!matches!(err, ApplicationError::Unknown(_)));
                prop_assert_eq!(err.code(), Some(code.as_str()));
            }
            other => prop_assert!(false, "unexpected result {:?}", other),
        }
    }

    #[test]
    fn prop_unknown_codes_are_preserved(code in unknown_error_code_strategy()) {
        let result = read_response::<LibraryRuleSet>(&error_response(404, &code), StatusCode::OK);

        match result {
            Err(VipCoreError::Application(ApplicationError::Unknown(actual))) => {
                prop_assert_eq!(actual, code);
            }
            other => prop_assert!(false, "unexpected result {:?}", other),
        }
    }

    #[test]
    fn prop_rules_decode_with_their_value(
        name in rule_name_strategy(),
        value in rule_value_strategy()
    ) {
        let field = if value.is_boolean() { "bool" } else { "string" };
        let rule: LibraryRule =
            serde_json::from_value(json!({"name": name, field: value})).unwrap();

        prop_assert_eq!(&rule.name, &name);
        let expected = match &value {
            serde_json::Value::Bool(flag) => RuleValue::Bool(*flag),
            other => RuleValue::String(other.as_str().unwrap_or_default().to_string()),
        };
        prop_assert_eq!(rule.value, expected);
    }

    #[test]
    fn prop_allowed_rules_are_the_true_flags(
        agency_id in agency_id_strategy(),
        rules in proptest::collection::vec((rule_name_strategy(), rule_value_strategy()), 0..12)
    ) {
        let rules: Vec<LibraryRule> = rules
            .into_iter()
            .map(|(name, value)| match value {
                serde_json::Value::Bool(flag) => LibraryRule::new(name, flag),
                other => LibraryRule::new(name, other.as_str().unwrap_or_default()),
            })
            .collect();
        let rule_set = LibraryRuleSet { agency_id, agency_type: None, rules: rules.clone() };

        let expected: HashSet<String> = rules
            .iter()
            .filter(|rule| rule.value == RuleValue::Bool(true))
            .map(|rule| rule.name.clone())
            .collect();

        prop_assert_eq!(rule_set.allowed_rules(), expected.clone());
        for rule in &rules {
            prop_assert_eq!(rule_set.has_feature(&rule.name), expected.contains(&rule.name));
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn prop_agency_search_cache_ignores_case(
        (name, name_variant) in case_variant_strategy(),
        (value, value_variant) in case_variant_strategy()
    ) {
        tokio_test::block_on(async {
            let mock = VipCoreMock::start().await;
            mock.on_library_rules(
                json!({"libraryRule": [{"name": name, "string": value}]}),
                200,
                fixtures::agency_search_response(&["710100"]),
                1,
            )
            .await;
            let config = VipCoreConfig::new(&mock.uri())
                .unwrap()
                .with_cache_ttl(Duration::from_secs(60));
            let client = LibraryRulesClient::open(&config).unwrap();

            let first = client.find_agencies_by_rule(&name, value.as_str()).await.unwrap();
            let second = client
                .find_agencies_by_rule(&name_variant, value_variant.as_str())
                .await
                .unwrap();

            assert_eq!(first, second);
            assert_eq!(client.agency_cache_metrics().hits.get(), 1);
        });
    }
}
