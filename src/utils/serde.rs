use serde::{Deserializer, de};
use std::fmt;

/// Deserialize `Option<Vec<String>>` from either a sequence or a single string.
///
/// Strings (typically environment variables) are split on newlines and commas.
/// Blank entries are dropped and an empty result becomes `None`.
pub fn deserialize_opt_vec_from_string<'de, D>(
    deserializer: D,
) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    struct ListVisitor;

    fn non_empty(items: Vec<String>) -> Option<Vec<String>> {
        if items.is_empty() { None } else { Some(items) }
    }

    impl<'de> de::Visitor<'de> for ListVisitor {
        type Value = Option<Vec<String>>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a newline or comma separated string, or a list of strings")
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(non_empty(
                value
                    .split(['\n', ','])
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect(),
            ))
        }

        fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
        where
            A: de::SeqAccess<'de>,
        {
            let mut items = Vec::new();
            while let Some(item) = seq.next_element::<String>()? {
                if !item.trim().is_empty() {
                    items.push(item.trim().to_string());
                }
            }
            Ok(non_empty(items))
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(None)
        }

        fn visit_none<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(None)
        }
    }

    deserializer.deserialize_any(ListVisitor)
}
