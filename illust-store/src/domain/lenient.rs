//! Deserializers for fields that older clients wrote with loose types: form
//! inputs saved numbers as strings, and the backend hands out numeric ids.

use serde::{de, Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(f64),
    String(String),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum IdRepr {
    Int(i64),
    UInt(u64),
    String(String),
}

pub fn number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    match NumberOrString::deserialize(deserializer)? {
        NumberOrString::Number(value) => Ok(value),
        NumberOrString::String(raw) if raw.trim().is_empty() => Ok(0.0),
        NumberOrString::String(raw) => raw
            .trim()
            .parse::<f64>()
            .map_err(|_| de::Error::custom(format!("invalid number: {raw:?}"))),
    }
}

pub fn id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match IdRepr::deserialize(deserializer)? {
        IdRepr::Int(value) => value.to_string(),
        IdRepr::UInt(value) => value.to_string(),
        IdRepr::String(value) => value,
    })
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Sample {
        #[serde(deserialize_with = "super::id")]
        id: String,
        #[serde(deserialize_with = "super::number")]
        price: f64,
    }

    #[test]
    fn accepts_numbers_and_numeric_strings() {
        let sample: Sample = serde_json::from_str(r#"{"id": 42, "price": "1500"}"#).unwrap();
        assert_eq!(sample.id, "42");
        assert_eq!(sample.price, 1500.0);

        let sample: Sample = serde_json::from_str(r#"{"id": "abc", "price": 2.5}"#).unwrap();
        assert_eq!(sample.id, "abc");
        assert_eq!(sample.price, 2.5);
    }

    #[test]
    fn rejects_garbage_numbers() {
        assert!(serde_json::from_str::<Sample>(r#"{"id": 1, "price": "lots"}"#).is_err());
    }
}
