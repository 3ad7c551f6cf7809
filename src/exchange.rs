// Copyright (c) 2025, The Ruskit Authors
// MIT License
// All rights reserved.

//! # Exchange Definitions
//!
//! This module provides the exchange half of a binding. Exchanges are the
//! routing mechanism in RabbitMQ that determine how messages are distributed
//! to queues. An `ExchangeSpec` is read from an `exchange[suffix]` section and
//! is immutable afterwards.

use crate::{config::ConfigSource, errors::AmqpError};
use std::{convert::Infallible, fmt, str::FromStr};

/// Option holding the exchange name
pub const EXCHANGE_NAME: &str = "name";
/// Option holding the exchange type
pub const EXCHANGE_KIND: &str = "type";
/// Option holding the durable flag
pub const EXCHANGE_DURABLE: &str = "durable";
/// Option holding the auto delete flag
pub const EXCHANGE_AUTO_DELETE: &str = "auto_delete";

/// Represents the types of exchanges available in RabbitMQ.
///
/// Each exchange type has specific routing behavior:
/// - Direct: Routes messages to queues based on an exact match of routing keys
/// - Fanout: Broadcasts messages to all bound queues regardless of routing keys
/// - Topic: Routes messages based on wildcard pattern matching of routing keys
/// - Headers: Routes based on message header values instead of routing keys
/// - Custom: Any other type provided by a broker plugin
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ExchangeKind {
    #[default]
    Direct,
    Fanout,
    Topic,
    Headers,
    Custom(String),
}

impl FromStr for ExchangeKind {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "direct" => ExchangeKind::Direct,
            "fanout" => ExchangeKind::Fanout,
            "topic" => ExchangeKind::Topic,
            "headers" => ExchangeKind::Headers,
            other => ExchangeKind::Custom(other.to_owned()),
        })
    }
}

impl fmt::Display for ExchangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExchangeKind::Direct => f.write_str("direct"),
            ExchangeKind::Fanout => f.write_str("fanout"),
            ExchangeKind::Topic => f.write_str("topic"),
            ExchangeKind::Headers => f.write_str("headers"),
            ExchangeKind::Custom(kind) => f.write_str(kind),
        }
    }
}

impl From<ExchangeKind> for lapin::ExchangeKind {
    fn from(kind: ExchangeKind) -> lapin::ExchangeKind {
        match kind {
            ExchangeKind::Direct => lapin::ExchangeKind::Direct,
            ExchangeKind::Fanout => lapin::ExchangeKind::Fanout,
            ExchangeKind::Headers => lapin::ExchangeKind::Headers,
            ExchangeKind::Topic => lapin::ExchangeKind::Topic,
            ExchangeKind::Custom(kind) => lapin::ExchangeKind::Custom(kind),
        }
    }
}

/// Definition of a RabbitMQ exchange.
///
/// Defaults to a durable, non auto-deleted direct exchange; each option found
/// in the section overrides its default independently.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExchangeSpec {
    pub(crate) name: String,
    pub(crate) kind: ExchangeKind,
    pub(crate) durable: bool,
    pub(crate) auto_delete: bool,
}

impl ExchangeSpec {
    /// Creates an exchange definition with the given name and default settings.
    pub fn new(name: &str) -> ExchangeSpec {
        ExchangeSpec {
            name: name.to_owned(),
            kind: ExchangeKind::Direct,
            durable: true,
            auto_delete: false,
        }
    }

    /// Builds the exchange described by `section`.
    ///
    /// # Errors
    /// * `MissingSection` when the section does not exist
    /// * `MissingName` when the section has no non-empty `name`
    /// * `InvalidOption` when a flag is not a boolean
    pub fn from_config<C>(cfg: &C, section: &str) -> Result<ExchangeSpec, AmqpError>
    where
        C: ConfigSource + ?Sized,
    {
        if !cfg.has_section(section) {
            return Err(AmqpError::MissingSection(section.to_owned()));
        }

        let name = match cfg.get_string(section, EXCHANGE_NAME) {
            Ok(name) if !name.is_empty() => name,
            _ => return Err(AmqpError::MissingName(section.to_owned())),
        };

        let mut exchange = ExchangeSpec::new(&name);

        if cfg.has_option(section, EXCHANGE_KIND) {
            exchange.kind = cfg
                .get_string(section, EXCHANGE_KIND)?
                .parse()
                .unwrap_or_default();
        }
        if cfg.has_option(section, EXCHANGE_DURABLE) {
            exchange.durable = cfg.get_bool(section, EXCHANGE_DURABLE)?;
        }
        if cfg.has_option(section, EXCHANGE_AUTO_DELETE) {
            exchange.auto_delete = cfg.get_bool(section, EXCHANGE_AUTO_DELETE)?;
        }

        Ok(exchange)
    }

    /// Returns the exchange name.
    ///
    /// # Returns
    /// The non-empty `name` option of the section
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the exchange type.
    ///
    /// # Returns
    /// The parsed `type` option, `Direct` when unset
    pub fn kind(&self) -> &ExchangeKind {
        &self.kind
    }

    /// Returns whether the exchange survives a broker restart.
    ///
    /// # Returns
    /// The `durable` option, true when unset
    pub fn durable(&self) -> bool {
        self.durable
    }

    /// Returns whether the exchange is deleted once its last binding is removed.
    ///
    /// # Returns
    /// The `auto_delete` option, false when unset
    pub fn auto_delete(&self) -> bool {
        self.auto_delete
    }
}

impl fmt::Display for ExchangeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "exchange {} (type={}, durable={}, auto_delete={})",
            self.name, self.kind, self.durable, self.auto_delete
        )
    }
}
