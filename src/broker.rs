// Copyright (c) 2025, The Ruskit Authors
// MIT License
// All rights reserved.

//! # Broker Capabilities
//!
//! The consumer talks to the broker only through these traits. The `channel`
//! module implements them on top of `lapin`; tests replace them with mocks.

use crate::{
    errors::AmqpError,
    exchange::ExchangeSpec,
    message::Message,
    queue::QueueSpec,
};
use async_trait::async_trait;
use futures_util::stream::BoxStream;
use std::sync::Arc;

/// Ordered deliveries pushed by the broker for one consumer tag.
pub type DeliveryStream = BoxStream<'static, Result<Message, AmqpError>>;

/// Opens connections to a broker.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Broker: Send + Sync {
    async fn dial(&self, url: &str) -> Result<Box<dyn BrokerConnection>, AmqpError>;
}

/// An open broker connection.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BrokerConnection: Send + Sync {
    async fn channel(&self) -> Result<Arc<dyn BrokerChannel>, AmqpError>;

    async fn close(&self) -> Result<(), AmqpError>;
}

/// A channel used to declare the topology and consume from it.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BrokerChannel: Send + Sync {
    async fn declare_exchange(&self, exchange: &ExchangeSpec) -> Result<(), AmqpError>;

    async fn declare_queue(&self, queue: &QueueSpec) -> Result<(), AmqpError>;

    async fn bind(&self, queue: &str, routing_key: &str, exchange: &str) -> Result<(), AmqpError>;

    /// Starts a manually acknowledged delivery stream on `queue`.
    async fn consume(
        &self,
        queue: &str,
        tag: &str,
        exclusive: bool,
    ) -> Result<DeliveryStream, AmqpError>;

    async fn cancel(&self, tag: &str) -> Result<(), AmqpError>;
}
