use serde::{Deserialize, Serialize};
use std::fmt;

/// Gateway-assigned identifier of a user (a Discord snowflake, as text).
#[derive(Debug, Clone, Hash, Eq, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

/// Identifier of the channel a message arrived on and replies go to.
#[derive(Debug, Clone, Hash, Eq, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChannelId(String);

macro_rules! impl_id_type {
    ($t:ty) => {
        impl $t {
            pub fn from_string(s: impl Into<String>) -> Self {
                Self(s.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $t {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<u64> for $t {
            fn from(id: u64) -> Self {
                Self(id.to_string())
            }
        }
    };
}

impl_id_type!(UserId);
impl_id_type!(ChannelId);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snowflake_ids_render_as_decimal_text() {
        let id = UserId::from(80351110224678912_u64);
        assert_eq!(id.as_str(), "80351110224678912");
        assert_eq!(id, UserId::from_string("80351110224678912"));
    }

    #[test]
    fn ids_deserialize_from_plain_strings() {
        let ids: Vec<UserId> = serde_yaml::from_str("- \"1\"\n- \"2\"\n").expect("valid yaml");
        assert_eq!(ids, vec![UserId::from_string("1"), UserId::from_string("2")]);
    }
}
