use super::key::ItemKey;

/// Serialize a parse result to a pretty-printed JSON string.
pub fn to_pretty_json(key: &ItemKey) -> String {
    serde_json::to_string_pretty(key).expect("ItemKey serialization cannot fail")
}

/// Serialize a batch of parse results to a pretty-printed JSON array.
pub fn to_pretty_json_all(keys: &[ItemKey]) -> String {
    serde_json::to_string_pretty(keys).expect("ItemKey serialization cannot fail")
}
