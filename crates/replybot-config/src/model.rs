use std::collections::HashMap;
use std::fmt;

use replybot_common::UserId;
use serde::de::{self, Deserializer, MapAccess, Visitor};
use serde::{Deserialize, Serialize};

/// The full bot configuration as read from `config.yaml`.
///
/// Unknown keys are rejected so that a misspelled `approved_only` cannot
/// silently leave the bot open to everyone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BotConfig {
    /// Exact message text mapped to the reply the bot sends back. A command
    /// listed twice is an error rather than last-one-wins.
    #[serde(default, deserialize_with = "unique_commands")]
    pub commands: HashMap<String, String>,

    /// When set, only users listed in `ids` may trigger commands. Also
    /// accepts the YAML 1.1 spellings (`yes`, `no`, `on`, `off`, ...).
    #[serde(default, deserialize_with = "yaml11_bool")]
    pub approved_only: bool,

    /// Users approved to trigger commands, in file order.
    #[serde(default)]
    pub ids: Vec<UserId>,
}

impl BotConfig {
    /// Reply configured for `text`, if any. Matching is exact and case-sensitive.
    pub fn reply_for(&self, text: &str) -> Option<&str> {
        self.commands.get(text).map(String::as_str)
    }

    /// Non-fatal problems worth surfacing when the config is loaded.
    pub fn warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        if self.commands.is_empty() {
            warnings.push("no commands configured, the bot will never reply".to_string());
        }
        if self.approved_only && self.ids.is_empty() {
            warnings.push("approved_only is set but ids is empty, nobody can use commands".to_string());
        }
        if !self.approved_only && !self.ids.is_empty() {
            warnings.push(format!(
                "{} id(s) listed but approved_only is false, the list is ignored",
                self.ids.len()
            ));
        }
        if self.commands.values().any(|reply| reply.trim().is_empty()) {
            warnings.push("one or more commands map to an empty reply".to_string());
        }

        warnings
    }
}

fn unique_commands<'de, D>(deserializer: D) -> Result<HashMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    struct UniqueCommands;

    impl<'de> Visitor<'de> for UniqueCommands {
        type Value = HashMap<String, String>;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a map of command text to reply")
        }

        fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(HashMap::new())
        }

        fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
            let mut commands = HashMap::with_capacity(access.size_hint().unwrap_or(0));
            while let Some((command, reply)) = access.next_entry::<String, String>()? {
                if commands.contains_key(&command) {
                    return Err(de::Error::custom(format!("duplicate command {command:?}")));
                }
                commands.insert(command, reply);
            }
            Ok(commands)
        }
    }

    deserializer.deserialize_map(UniqueCommands)
}

fn yaml11_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    struct Yaml11Bool;

    impl<'de> Visitor<'de> for Yaml11Bool {
        type Value = bool;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a boolean (true/false, yes/no, on/off, y/n)")
        }

        fn visit_bool<E: de::Error>(self, v: bool) -> Result<bool, E> {
            Ok(v)
        }

        fn visit_unit<E: de::Error>(self) -> Result<bool, E> {
            Ok(false)
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<bool, E> {
            match v {
                "y" | "Y" | "yes" | "Yes" | "YES" | "true" | "True" | "TRUE" | "on" | "On"
                | "ON" => Ok(true),
                "n" | "N" | "no" | "No" | "NO" | "false" | "False" | "FALSE" | "off" | "Off"
                | "OFF" => Ok(false),
                _ => Err(E::invalid_value(de::Unexpected::Str(v), &self)),
            }
        }
    }

    deserializer.deserialize_any(Yaml11Bool)
}
