/// Aggregator response structures
/// Numeric fields arrive either as JSON strings or numbers depending on the API version.
use alloy_primitives::{Address, Bytes};
use serde::{Deserialize, Deserializer};

/// Custom deserializer for fields that can be either string or number
pub fn deserialize_string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::{self, Visitor};
    use std::fmt;

    struct StringOrNumber;

    impl<'de> Visitor<'de> for StringOrNumber {
        type Value = String;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a string or number")
        }

        fn visit_str<E>(self, value: &str) -> Result<String, E>
        where
            E: de::Error,
        {
            Ok(value.to_owned())
        }

        fn visit_u64<E>(self, value: u64) -> Result<String, E>
        where
            E: de::Error,
        {
            Ok(value.to_string())
        }

        fn visit_i64<E>(self, value: i64) -> Result<String, E>
        where
            E: de::Error,
        {
            if value < 0 {
                return Err(E::custom(format!("negative quantity {}", value)));
            }
            Ok(value.to_string())
        }
    }

    deserializer.deserialize_any(StringOrNumber)
}

/// Custom deserializer for optional fields that can be either string or number
pub fn deserialize_optional_string_or_number<'de, D>(
    deserializer: D,
) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::{self, Visitor};
    use std::fmt;

    struct OptionalStringOrNumber;

    impl<'de> Visitor<'de> for OptionalStringOrNumber {
        type Value = Option<String>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("an optional string or number")
        }

        fn visit_none<E>(self) -> Result<Option<String>, E>
        where
            E: de::Error,
        {
            Ok(None)
        }

        fn visit_unit<E>(self) -> Result<Option<String>, E>
        where
            E: de::Error,
        {
            Ok(None)
        }

        fn visit_some<D>(self, deserializer: D) -> Result<Option<String>, D::Error>
        where
            D: Deserializer<'de>,
        {
            deserialize_string_or_number(deserializer).map(Some)
        }
    }

    deserializer.deserialize_option(OptionalStringOrNumber)
}

#[derive(Debug, Deserialize)]
pub struct SpenderResponse {
    pub address: Address,
}

#[derive(Debug, Deserialize)]
pub struct SwapResponse {
    pub tx: SwapTx,
}

#[derive(Debug, Deserialize)]
pub struct SwapTx {
    pub to: Address,
    pub data: Bytes,
    #[serde(default, deserialize_with = "deserialize_optional_string_or_number")]
    pub value: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_string_or_number")]
    pub gas: Option<String>,
    #[serde(
        rename = "gasPrice",
        default,
        deserialize_with = "deserialize_optional_string_or_number"
    )]
    pub gas_price: Option<String>,
}

/// Error body of a non-2xx response
#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub description: Option<String>,
}
