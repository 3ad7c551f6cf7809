// Copyright (c) 2025, The Ruskit Authors
// MIT License
// All rights reserved.

//! # Queue Definitions
//!
//! This module provides the queue half of a binding, read from a
//! `queue[suffix]` section. The queue also carries the routing key used to
//! bind it to its exchange and derives the consumer tag of its delivery stream.

use crate::{config::ConfigSource, errors::AmqpError};
use std::fmt;

pub const QUEUE_NAME: &str = "name";
pub const QUEUE_DURABLE: &str = "durable";
pub const QUEUE_AUTO_DELETE: &str = "auto_delete";
pub const QUEUE_EXCLUSIVE: &str = "exclusive";
pub const QUEUE_ROUTING_KEY: &str = "routing_key";

/// Definition of a RabbitMQ queue with its configuration parameters.
///
/// Queues default to durable, exclusive, not auto-deleted and bound with an
/// empty routing key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueSpec {
    pub(crate) name: String,
    pub(crate) durable: bool,
    pub(crate) auto_delete: bool,
    pub(crate) exclusive: bool,
    pub(crate) routing_key: String,
}

impl QueueSpec {
    /// Creates a new queue definition with the given name and default settings.
    pub fn new(name: &str) -> QueueSpec {
        QueueSpec {
            name: name.to_owned(),
            durable: true,
            auto_delete: false,
            exclusive: true,
            routing_key: String::new(),
        }
    }

    /// Builds the queue described by `section`.
    ///
    /// # Errors
    /// * `MissingSection` when the section does not exist
    /// * `MissingName` when the section has no non-empty `name`
    /// * `InvalidOption` when a flag is not a boolean
    pub fn from_config<C>(cfg: &C, section: &str) -> Result<QueueSpec, AmqpError>
    where
        C: ConfigSource + ?Sized,
    {
        if !cfg.has_section(section) {
            return Err(AmqpError::MissingSection(section.to_owned()));
        }

        let name = match cfg.get_string(section, QUEUE_NAME) {
            Ok(name) if !name.is_empty() => name,
            _ => return Err(AmqpError::MissingName(section.to_owned())),
        };

        let mut queue = QueueSpec::new(&name);

        if cfg.has_option(section, QUEUE_DURABLE) {
            queue.durable = cfg.get_bool(section, QUEUE_DURABLE)?;
        }
        if cfg.has_option(section, QUEUE_AUTO_DELETE) {
            queue.auto_delete = cfg.get_bool(section, QUEUE_AUTO_DELETE)?;
        }
        if cfg.has_option(section, QUEUE_EXCLUSIVE) {
            queue.exclusive = cfg.get_bool(section, QUEUE_EXCLUSIVE)?;
        }
        if cfg.has_option(section, QUEUE_ROUTING_KEY) {
            queue.routing_key = cfg.get_string(section, QUEUE_ROUTING_KEY)?;
        }

        Ok(queue)
    }

    /// Sets the routing key used to bind the queue.
    pub fn routing_key(mut self, key: &str) -> Self {
        self.routing_key = key.to_owned();
        self
    }

    /// Makes the queue shareable between connections.
    pub fn shared(mut self) -> Self {
        self.exclusive = false;
        self
    }

    /// Returns the queue name.
    ///
    /// # Returns
    /// The non-empty `name` option of the section
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns whether the queue survives a broker restart.
    ///
    /// # Returns
    /// The `durable` option, true when unset
    pub fn durable(&self) -> bool {
        self.durable
    }

    /// Returns whether the queue is deleted once its last consumer leaves.
    ///
    /// # Returns
    /// The `auto_delete` option, false when unset
    pub fn auto_delete(&self) -> bool {
        self.auto_delete
    }

    /// Returns whether the queue and its delivery stream are exclusive to the connection.
    ///
    /// # Returns
    /// The `exclusive` option, true when unset
    pub fn exclusive(&self) -> bool {
        self.exclusive
    }

    /// Returns the routing key binding the queue to its exchange.
    ///
    /// # Returns
    /// The `routing_key` option, empty when unset
    pub fn key(&self) -> &str {
        &self.routing_key
    }

    /// Consumer tag of the delivery stream opened on this queue.
    pub fn tag(&self) -> String {
        format!("{}-{}", self.name, self.routing_key)
    }
}

impl fmt::Display for QueueSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "queue {} (durable={}, auto_delete={}, exclusive={}, routing_key={})",
            self.name, self.durable, self.auto_delete, self.exclusive, self.routing_key
        )
    }
}
