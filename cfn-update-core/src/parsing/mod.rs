//! `KEY=VALUE` parameter override parsing (pure Rust)

use crate::types::ParameterSet;
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParameterError {
    #[error("Malformed parameter '{0}': expected KEY=VALUE")]
    Malformed(String),
    #[error("Parameter '{0}' has an empty value")]
    EmptyValue(String),
    #[error("Duplicate parameter '{0}'")]
    DuplicateKey(String),
}

/// Parse raw `KEY=VALUE` strings into a [`ParameterSet`].
///
/// Blank elements are skipped. The name is everything before the first `=`,
/// the value everything after it; values are kept as given but must not be
/// blank. Parsing is all-or-nothing.
pub fn parse_parameters<I, S>(raw: I) -> Result<ParameterSet, ParameterError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut parameters = BTreeMap::new();
    for element in raw {
        let element = element.as_ref();
        if element.trim().is_empty() {
            continue;
        }

        let (name, value) = element
            .split_once('=')
            .ok_or_else(|| ParameterError::Malformed(element.to_string()))?;
        if name.trim().is_empty() {
            return Err(ParameterError::Malformed(element.to_string()));
        }
        if value.trim().is_empty() {
            return Err(ParameterError::EmptyValue(name.to_string()));
        }

        match parameters.entry(name.to_string()) {
            Entry::Occupied(_) => return Err(ParameterError::DuplicateKey(name.to_string())),
            Entry::Vacant(slot) => {
                slot.insert(value.to_string());
            }
        }
    }
    Ok(ParameterSet::new(parameters))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_parse_parameters_table() {
        let cases: Vec<(Vec<&str>, Option<usize>)> = vec![
            (vec![], Some(0)),
            (vec!["\n"], Some(0)),
            (vec!["k=v"], Some(1)),
            (vec!["k=v", "k=v"], None),
            (vec!["k=v", "k2=v"], Some(2)),
            (vec!["k=v", "", "k2=v", ""], Some(2)),
            (vec!["k=v", "k2=v", "k=v"], None),
            (vec!["k=v", "junk"], None),
            (vec!["k= ", "k2=v"], None),
        ];

        for (input, expected) in cases {
            let result = parse_parameters(&input);
            match expected {
                Some(len) => {
                    let parsed = result.unwrap_or_else(|e| panic!("{input:?}: {e}"));
                    assert_eq!(parsed.len(), len, "input: {input:?}");
                }
                None => assert!(result.is_err(), "input: {input:?} should fail"),
            }
        }
    }

    #[test]
    fn test_single_pair() {
        let parsed = parse_parameters(["k=v"]).expect("should parse");
        assert_eq!(parsed.get("k"), Some("v"));
    }

    #[test]
    fn test_blank_elements_are_ignored() {
        let parsed = parse_parameters(["k=v", "", "k2=v", "  \t"]).expect("should parse");
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed.get("k"), Some("v"));
        assert_eq!(parsed.get("k2"), Some("v"));
    }

    #[test]
    fn test_missing_separator_names_element() {
        let err = parse_parameters(["k=v", "junk"]).unwrap_err();
        assert_eq!(err, ParameterError::Malformed("junk".to_string()));
        assert!(err.to_string().contains("junk"));
    }

    #[test]
    fn test_empty_name_is_malformed() {
        let err = parse_parameters(["=value"]).unwrap_err();
        assert_eq!(err, ParameterError::Malformed("=value".to_string()));
    }

    #[test]
    fn test_blank_value_is_rejected() {
        assert_eq!(
            parse_parameters(["k= ", "k2=v"]).unwrap_err(),
            ParameterError::EmptyValue("k".to_string())
        );
        assert_eq!(
            parse_parameters(["k="]).unwrap_err(),
            ParameterError::EmptyValue("k".to_string())
        );
    }

    #[test]
    fn test_duplicate_key_names_parameter() {
        let err = parse_parameters(["k=v", "k2=v", "k=other"]).unwrap_err();
        assert_eq!(err, ParameterError::DuplicateKey("k".to_string()));
        assert!(err.to_string().contains("'k'"));
    }

    #[test]
    fn test_value_keeps_additional_separators() {
        let parsed = parse_parameters(["Token=abc==", "Url=https://x?a=b"]).expect("should parse");
        assert_eq!(parsed.get("Token"), Some("abc=="));
        assert_eq!(parsed.get("Url"), Some("https://x?a=b"));
    }

    #[test]
    fn test_value_is_not_trimmed() {
        let parsed = parse_parameters(["Motd= hello "]).expect("should parse");
        assert_eq!(parsed.get("Motd"), Some(" hello "));
    }

    fn unique_pairs() -> impl Strategy<Value = BTreeMap<String, String>> {
        prop::collection::btree_map("[A-Za-z][A-Za-z0-9]{0,8}", "[a-z0-9]{1,8}", 0..8)
    }

    proptest! {
        #[test]
        fn prop_unique_pairs_parse_one_entry_each(pairs in unique_pairs(), blanks in 0usize..4) {
            let mut input: Vec<String> = pairs.iter().map(|(k, v)| format!("{k}={v}")).collect();
            input.extend(std::iter::repeat(" ".to_string()).take(blanks));

            let parsed = parse_parameters(&input).expect("well-formed input should parse");
            prop_assert_eq!(parsed.len(), pairs.len());
            for (k, v) in &pairs {
                prop_assert_eq!(parsed.get(k), Some(v.as_str()));
            }
        }

        #[test]
        fn prop_repeated_key_always_fails(pairs in unique_pairs(), position in 0usize..8) {
            prop_assume!(!pairs.is_empty());
            let mut input: Vec<String> = pairs.iter().map(|(k, v)| format!("{k}={v}")).collect();
            let repeat = input[position % input.len()].clone();
            let at = position % (input.len() + 1);
            input.insert(at, repeat);

            prop_assert!(matches!(
                parse_parameters(&input),
                Err(ParameterError::DuplicateKey(_))
            ));
        }

        #[test]
        fn prop_element_without_separator_always_fails(
            pairs in unique_pairs(),
            junk in "[A-Za-z0-9]{1,10}",
        ) {
            let mut input: Vec<String> = pairs.iter().map(|(k, v)| format!("{k}={v}")).collect();
            input.push(junk.clone());

            prop_assert_eq!(parse_parameters(&input), Err(ParameterError::Malformed(junk)));
        }
    }
}
