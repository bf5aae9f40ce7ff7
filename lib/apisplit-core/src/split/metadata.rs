use crate::tree::Metadata;

/// Set on a document whose tags were split out.
pub const IS_SPLITTED_BY_TAG: &str = "_isSplittedByTag";
/// Set on a document split out for one tag.
pub const IS_SPLITTED_TO_TAG: &str = "_isSplittedToTag";
/// Set on a document whose operations were split out.
pub const IS_SPLITTED_BY_OPERATION: &str = "_isSplittedByOperation";
/// Set on a document split out for one operation.
pub const IS_SPLITTED_TO_OPERATION: &str = "_isSplittedToOperation";

/// Merges two metadata bags: `primary` wins, `fallback` fills the absent keys.
pub fn merge_metadata(mut primary: Metadata, fallback: &Metadata) -> Metadata {
    for (key, value) in fallback {
        primary.entry(key.clone()).or_insert_with(|| value.clone());
    }
    primary
}

pub(crate) fn set_flag(metadata: &mut Metadata, flag: &str) {
    metadata.insert(flag.to_string(), serde_json::Value::Bool(true));
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn bag(value: serde_json::Value) -> Metadata {
        serde_json::from_value(value).expect("an object")
    }

    #[test]
    fn should_prefer_primary_values() {
        let merged = merge_metadata(bag(json!({ "x": 2 })), &bag(json!({ "x": 1 })));

        assert_eq!(merged, bag(json!({ "x": 2 })));
    }

    #[test]
    fn should_fill_absent_keys_from_fallback() {
        let merged = merge_metadata(
            bag(json!({ "x": 2 })),
            &bag(json!({ "swagger": "2.0", "x": 1 })),
        );

        insta::assert_json_snapshot!(merged, @r#"
        {
          "x": 2,
          "swagger": "2.0"
        }
        "#);
    }
}
