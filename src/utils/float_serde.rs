//! Serde encoding for test statistics that may be infinite.
//!
//! JSON has no representation for infinity or NaN, so serde_json writes them
//! as `null`. Fields using these modules write finite values as numbers and
//! non-finite ones as the strings `"inf"`, `"-inf"` and `"nan"`.
//!
//! ```
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Serialize, Deserialize)]
//! struct Stat {
//!     #[serde(with = "structural_breaks::utils::float_serde")]
//!     f: f64,
//! }
//!
//! let json = serde_json::to_string(&Stat { f: f64::INFINITY }).unwrap();
//! assert_eq!(json, r#"{"f":"inf"}"#);
//! let back: Stat = serde_json::from_str(&json).unwrap();
//! assert_eq!(back.f, f64::INFINITY);
//! ```

use serde::{Deserialize, Deserializer, Serialize, Serializer};

const POS_INF: &str = "inf";
const NEG_INF: &str = "-inf";
const NAN: &str = "nan";

#[derive(Deserialize)]
#[serde(untagged)]
enum Repr {
    Number(f64),
    Text(String),
}

impl Repr {
    fn into_f64<E: serde::de::Error>(self) -> Result<f64, E> {
        match self {
            Repr::Number(v) => Ok(v),
            Repr::Text(s) => match s.as_str() {
                POS_INF => Ok(f64::INFINITY),
                NEG_INF => Ok(f64::NEG_INFINITY),
                NAN => Ok(f64::NAN),
                other => Err(E::custom(format!("invalid float literal '{}'", other))),
            },
        }
    }
}

struct Encoded(f64);

impl Serialize for Encoded {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let v = self.0;
        if v.is_finite() {
            serializer.serialize_f64(v)
        } else if v.is_nan() {
            serializer.serialize_str(NAN)
        } else if v > 0.0 {
            serializer.serialize_str(POS_INF)
        } else {
            serializer.serialize_str(NEG_INF)
        }
    }
}

pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    Encoded(*value).serialize(serializer)
}

pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    Repr::deserialize(deserializer)?.into_f64()
}

/// Same encoding for `Option<f64>`; `None` stays `null`.
pub mod option {
    use super::{Encoded, Repr};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        value: &Option<f64>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(v) => serializer.serialize_some(&Encoded(*v)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<f64>, D::Error> {
        Option::<Repr>::deserialize(deserializer)?
            .map(Repr::into_f64)
            .transpose()
    }
}
