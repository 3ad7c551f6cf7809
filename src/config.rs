// Copyright (c) 2025, The Ruskit Authors
// MIT License
// All rights reserved.

//! # Configuration Snapshot
//!
//! The topology is described by named sections of key/value options. This
//! module defines the `ConfigSource` capability the builders read from, and
//! `ConfigSnapshot`, an immutable section map that can be loaded from INI text
//! or JSON. Nothing reads the snapshot again once the topology is built.

use crate::errors::AmqpError;
use ::config::{Config, File, FileFormat};
use serde::Deserialize;
use serde_json::{Number, Value};
use std::{collections::BTreeMap, fs, path::Path};
use tracing::debug;

/// Section used for options that appear before any `[section]` header
pub const DEFAULT_SECTION: &str = "default";

/// Read access to section-keyed configuration options.
pub trait ConfigSource {
    /// Returns true when the section exists, even if it has no options.
    fn has_section(&self, section: &str) -> bool;

    /// Returns true when the option exists in the section.
    fn has_option(&self, section: &str, key: &str) -> bool;

    /// Returns the raw value of an option.
    fn get_string(&self, section: &str, key: &str) -> Result<String, AmqpError>;

    /// Returns an option parsed as a boolean.
    fn get_bool(&self, section: &str, key: &str) -> Result<bool, AmqpError>;

    /// Returns an option parsed as a signed integer.
    fn get_int(&self, section: &str, key: &str) -> Result<i64, AmqpError>;

    /// Returns every section name.
    fn section_names(&self) -> Vec<String>;
}

/// An immutable mapping from section name to option name to value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigSnapshot {
    sections: BTreeMap<String, BTreeMap<String, String>>,
}

/// Top level entry of a parsed INI document.
#[derive(Deserialize)]
#[serde(untagged)]
enum IniEntry {
    Section(BTreeMap<String, String>),
    Option(String),
}

/// Option value of a JSON document.
#[derive(Deserialize)]
#[serde(untagged)]
enum JsonScalar {
    Text(String),
    Flag(bool),
    Number(Number),
    Other(Value),
}

impl ConfigSnapshot {
    /// Creates a snapshot from already parsed sections.
    pub fn new(sections: BTreeMap<String, BTreeMap<String, String>>) -> Self {
        ConfigSnapshot { sections }
    }

    /// Parses INI formatted text.
    ///
    /// Sections are introduced by `[name]`, options are written `key = value`
    /// or `key: value`, and lines starting with `#` or `;` are comments.
    /// Options that appear before any header land in the `default` section.
    /// Section names must not contain dots, the loader reads them as paths.
    pub fn from_ini(content: &str) -> Result<Self, AmqpError> {
        let loaded = Config::builder()
            .add_source(File::from_str(content, FileFormat::Ini))
            .build()
            .map_err(|err| AmqpError::ConfigFileError(err.to_string()))?;

        let entries: BTreeMap<String, IniEntry> = loaded
            .try_deserialize()
            .map_err(|err| AmqpError::ConfigFileError(err.to_string()))?;

        let mut sections: BTreeMap<String, BTreeMap<String, String>> = BTreeMap::new();
        for (name, entry) in entries {
            match entry {
                IniEntry::Section(options) => sections.entry(name).or_default().extend(options),
                IniEntry::Option(value) => {
                    sections
                        .entry(DEFAULT_SECTION.to_owned())
                        .or_default()
                        .insert(name, value);
                }
            }
        }

        Ok(ConfigSnapshot { sections })
    }

    /// Reads and parses an INI file.
    pub fn from_ini_file<P: AsRef<Path>>(path: P) -> Result<Self, AmqpError> {
        let path = path.as_ref();
        debug!("reading configuration file: {}", path.display());

        let content = fs::read_to_string(path).map_err(|err| {
            AmqpError::ConfigFileError(format!("{}: {}", path.display(), err))
        })?;

        Self::from_ini(&content)
    }

    /// Parses a JSON object of objects.
    ///
    /// Option values may be strings, booleans or numbers; they are kept in
    /// their textual form like every INI value.
    pub fn from_json(content: &str) -> Result<Self, AmqpError> {
        let raw: BTreeMap<String, BTreeMap<String, JsonScalar>> = serde_json::from_str(content)
            .map_err(|err| AmqpError::ConfigFileError(err.to_string()))?;

        let mut sections = BTreeMap::new();
        for (section, options) in raw {
            let mut values = BTreeMap::new();
            for (key, value) in options {
                let text = match value {
                    JsonScalar::Text(s) => s,
                    JsonScalar::Flag(b) => b.to_string(),
                    JsonScalar::Number(n) => n.to_string(),
                    JsonScalar::Other(other) => {
                        return Err(AmqpError::InvalidOption {
                            section,
                            key,
                            value: other.to_string(),
                        })
                    }
                };
                values.insert(key, text);
            }
            sections.insert(section, values);
        }

        Ok(ConfigSnapshot { sections })
    }

    fn invalid(section: &str, key: &str, value: &str) -> AmqpError {
        AmqpError::InvalidOption {
            section: section.to_owned(),
            key: key.to_owned(),
            value: value.to_owned(),
        }
    }
}

impl ConfigSource for ConfigSnapshot {
    fn has_section(&self, section: &str) -> bool {
        self.sections.contains_key(section)
    }

    fn has_option(&self, section: &str, key: &str) -> bool {
        self.sections
            .get(section)
            .is_some_and(|options| options.contains_key(key))
    }

    fn get_string(&self, section: &str, key: &str) -> Result<String, AmqpError> {
        let options = self
            .sections
            .get(section)
            .ok_or_else(|| AmqpError::MissingSection(section.to_owned()))?;

        options
            .get(key)
            .cloned()
            .ok_or_else(|| AmqpError::MissingOption(section.to_owned(), key.to_owned()))
    }

    fn get_bool(&self, section: &str, key: &str) -> Result<bool, AmqpError> {
        let value = self.get_string(section, key)?;
        match value.to_lowercase().as_str() {
            "1" | "t" | "true" | "y" | "yes" | "on" => Ok(true),
            "0" | "f" | "false" | "n" | "no" | "off" => Ok(false),
            _ => Err(Self::invalid(section, key, &value)),
        }
    }

    fn get_int(&self, section: &str, key: &str) -> Result<i64, AmqpError> {
        let value = self.get_string(section, key)?;
        value
            .trim()
            .parse()
            .map_err(|_| Self::invalid(section, key, &value))
    }

    fn section_names(&self) -> Vec<String> {
        self.sections.keys().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_sections_and_options() {
        let cfg = ConfigSnapshot::from_ini(
            "
# leading comment
[connection]
host = rabbit.local
port: 5673

[queue-front]
; inline note
name = front-events
routing_key = a=b
",
        )
        .unwrap();

        assert!(cfg.has_section("connection"));
        assert!(cfg.has_option("connection", "port"));
        assert_eq!(cfg.get_string("connection", "host").unwrap(), "rabbit.local");
        assert_eq!(cfg.get_int("connection", "port").unwrap(), 5673);
        assert_eq!(cfg.get_string("queue-front", "routing_key").unwrap(), "a=b");
        assert_eq!(cfg.section_names(), vec!["connection", "queue-front"]);
    }

    #[test]
    fn empty_section_still_exists() {
        let cfg = ConfigSnapshot::from_ini("[connection]\n").unwrap();
        assert!(cfg.has_section("connection"));
        assert!(!cfg.has_option("connection", "host"));
    }

    #[test]
    fn options_before_any_header_go_to_default() {
        let cfg = ConfigSnapshot::from_ini("name = x\n").unwrap();
        assert_eq!(cfg.get_string(DEFAULT_SECTION, "name").unwrap(), "x");
    }

    #[test]
    fn rejects_malformed_lines() {
        assert!(matches!(
            ConfigSnapshot::from_ini("[connection\nhost = a"),
            Err(AmqpError::ConfigFileError(_))
        ));
        assert!(matches!(
            ConfigSnapshot::from_ini("[connection]\nhost"),
            Err(AmqpError::ConfigFileError(_))
        ));
    }

    #[test]
    fn dotted_section_names_are_rejected() {
        assert!(matches!(
            ConfigSnapshot::from_ini("[queue.front]\nname = q\n"),
            Err(AmqpError::ConfigFileError(_))
        ));
    }

    #[test]
    fn bool_spellings() {
        let cfg = ConfigSnapshot::from_ini("[s]\na = Yes\nb = off\nc = 1\nd = maybe").unwrap();
        assert!(cfg.get_bool("s", "a").unwrap());
        assert!(!cfg.get_bool("s", "b").unwrap());
        assert!(cfg.get_bool("s", "c").unwrap());
        assert_eq!(
            cfg.get_bool("s", "d"),
            Err(AmqpError::InvalidOption {
                section: "s".to_owned(),
                key: "d".to_owned(),
                value: "maybe".to_owned(),
            })
        );
    }

    #[test]
    fn lookups_on_missing_section_fail() {
        let cfg = ConfigSnapshot::default();
        assert_eq!(
            cfg.get_string("connection", "host"),
            Err(AmqpError::MissingSection("connection".to_owned()))
        );
    }

    #[test]
    fn loads_json_scalars() {
        let cfg = ConfigSnapshot::from_json(
            r#"{"connection": {"port": 5673, "host": "h"}, "exchange": {"name": "ex", "durable": false}}"#,
        )
        .unwrap();

        assert_eq!(cfg.get_int("connection", "port").unwrap(), 5673);
        assert!(!cfg.get_bool("exchange", "durable").unwrap());
        assert!(matches!(
            ConfigSnapshot::from_json(r#"{"queue": {"name": ["a"]}}"#),
            Err(AmqpError::InvalidOption { .. })
        ));
    }

    #[test]
    fn missing_file_is_reported() {
        assert!(matches!(
            ConfigSnapshot::from_ini_file("/definitely/not/here.ini"),
            Err(AmqpError::ConfigFileError(_))
        ));
    }
}
