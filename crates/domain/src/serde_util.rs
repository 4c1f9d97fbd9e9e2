//! Shared serde helpers for patch types.

use serde::{Deserialize, Deserializer};

/// Distinguish an explicit `null` from an absent field.
///
/// Pair with `#[serde(default)]`: an absent field stays `None`, `null`
/// becomes `Some(None)` and a string becomes `Some(Some(_))`.
pub(crate) fn present<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Note {
        #[serde(default, deserialize_with = "super::present")]
        note: Option<Option<String>>,
    }

    #[test]
    fn should_tell_absent_null_and_value_apart() {
        let absent: Note = serde_json::from_str("{}").unwrap();
        let null: Note = serde_json::from_str(r#"{"note":null}"#).unwrap();
        let value: Note = serde_json::from_str(r#"{"note":"hi"}"#).unwrap();

        assert_eq!(absent.note, None);
        assert_eq!(null.note, Some(None));
        assert_eq!(value.note, Some(Some("hi".to_string())));
    }
}
