// Copyright (c) 2025, The Ruskit Authors
// MIT License
// All rights reserved.

//! # RabbitMQ Topology
//!
//! This module builds the topology a consumer declares: one connection plus an
//! ordered list of exchange/queue bindings.
//!
//! Bindings are discovered from section names. Every `queue[suffix]` section
//! must pair with an `exchange[suffix]` section, where the suffix is whatever
//! follows the prefix (possibly nothing):
//!
//! ```ini
//! [connection]
//! host = localhost
//!
//! [queue-front]
//! name = front-events
//! routing_key = events
//!
//! [exchange-front]
//! name = fe-events
//! ```
//!
//! Bindings are ordered by suffix, not by declaration order.

use crate::{
    config::ConfigSource, connection::ConnectionSpec, errors::AmqpError, exchange::ExchangeSpec,
    queue::QueueSpec,
};
use tracing::debug;

/// Prefix of the sections describing queues
pub const QUEUE_PREFIX: &str = "queue";
/// Prefix of the sections describing exchanges
pub const EXCHANGE_PREFIX: &str = "exchange";

/// One exchange bound to one queue with the queue's routing key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    pub(crate) suffix: String,
    pub(crate) exchange: ExchangeSpec,
    pub(crate) queue: QueueSpec,
}

impl Binding {
    pub fn new(suffix: &str, exchange: ExchangeSpec, queue: QueueSpec) -> Binding {
        Binding {
            suffix: suffix.to_owned(),
            exchange,
            queue,
        }
    }

    /// Section name remainder shared by the exchange and the queue, e.g. `-front`.
    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    pub fn exchange(&self) -> &ExchangeSpec {
        &self.exchange
    }

    pub fn queue(&self) -> &QueueSpec {
        &self.queue
    }
}

/// The connection and every binding to declare on it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Topology {
    connection: ConnectionSpec,
    bindings: Vec<Binding>,
}

impl Topology {
    pub fn new(connection: ConnectionSpec, bindings: Vec<Binding>) -> Topology {
        Topology {
            connection,
            bindings,
        }
    }

    /// Builds the topology described by a configuration snapshot.
    ///
    /// The connection is built first, so a missing `[connection]` section is
    /// reported before any binding is looked at. Queue and exchange suffixes
    /// are then collected in full and compared before any binding is built.
    ///
    /// # Errors
    /// * `MissingSection` when there is no `[connection]` section
    /// * `BindingCountMismatch` when queues and exchanges are not equally many
    /// * `BindingNameMismatch` when their suffixes do not pair up
    /// * any error raised while reading a single exchange or queue
    pub fn from_config<C>(cfg: &C) -> Result<Topology, AmqpError>
    where
        C: ConfigSource + ?Sized,
    {
        let connection = ConnectionSpec::from_config(cfg)?;

        let sections = cfg.section_names();
        let suffixes = check_sections(&sections)?;

        let mut bindings = Vec::with_capacity(suffixes.len());
        for suffix in suffixes {
            let exchange = ExchangeSpec::from_config(cfg, &format!("{EXCHANGE_PREFIX}{suffix}"))?;
            let queue = QueueSpec::from_config(cfg, &format!("{QUEUE_PREFIX}{suffix}"))?;

            debug!("binding{}: {} -> {}", suffix, exchange, queue);
            bindings.push(Binding::new(&suffix, exchange, queue));
        }

        Ok(Topology {
            connection,
            bindings,
        })
    }

    pub fn connection(&self) -> &ConnectionSpec {
        &self.connection
    }

    pub fn bindings(&self) -> &[Binding] {
        &self.bindings
    }
}

/// Ensures queue and exchange sections pair up by suffix.
///
/// Returns the shared suffixes sorted ascending.
fn check_sections(sections: &[String]) -> Result<Vec<String>, AmqpError> {
    let mut queues: Vec<String> = sections
        .iter()
        .filter_map(|s| s.strip_prefix(QUEUE_PREFIX))
        .map(str::to_owned)
        .collect();
    let mut exchanges: Vec<String> = sections
        .iter()
        .filter_map(|s| s.strip_prefix(EXCHANGE_PREFIX))
        .map(str::to_owned)
        .collect();

    queues.sort();
    exchanges.sort();

    if queues.len() != exchanges.len() {
        return Err(AmqpError::BindingCountMismatch { queues, exchanges });
    }

    if queues != exchanges {
        return Err(AmqpError::BindingNameMismatch { queues, exchanges });
    }

    Ok(queues)
}
