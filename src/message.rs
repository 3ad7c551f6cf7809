// Copyright (c) 2025, The Ruskit Authors
// MIT License
// All rights reserved.

//! # Consumed Messages
//!
//! A `Message` is what the handler receives for every delivery. It exposes
//! the routing information and payload, and lets the handler acknowledge or
//! reject the delivery; the consumer never does that on its behalf.

use crate::errors::AmqpError;
use async_trait::async_trait;
use std::{collections::BTreeMap, fmt, sync::Arc};

/// Settles a single delivery on the broker.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Acknowledger: Send + Sync {
    async fn ack(&self, multiple: bool) -> Result<(), AmqpError>;

    async fn nack(&self, multiple: bool, requeue: bool) -> Result<(), AmqpError>;
}

/// A delivery received from one of the topology's queues.
#[derive(Clone)]
pub struct Message {
    pub(crate) exchange: String,
    pub(crate) routing_key: String,
    pub(crate) body: Vec<u8>,
    pub(crate) headers: BTreeMap<String, String>,
    pub(crate) delivery_tag: u64,
    pub(crate) redelivered: bool,
    pub(crate) acker: Arc<dyn Acknowledger>,
}

impl Message {
    pub fn new(
        exchange: &str,
        routing_key: &str,
        body: Vec<u8>,
        acker: Arc<dyn Acknowledger>,
    ) -> Message {
        Message {
            exchange: exchange.to_owned(),
            routing_key: routing_key.to_owned(),
            body,
            headers: BTreeMap::default(),
            delivery_tag: 0,
            redelivered: false,
            acker,
        }
    }

    pub fn headers(mut self, headers: BTreeMap<String, String>) -> Self {
        self.headers = headers;
        self
    }

    pub fn delivery(mut self, tag: u64, redelivered: bool) -> Self {
        self.delivery_tag = tag;
        self.redelivered = redelivered;
        self
    }

    pub fn exchange(&self) -> &str {
        &self.exchange
    }

    pub fn routing_key(&self) -> &str {
        &self.routing_key
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Textual message headers, used for trace context propagation.
    pub fn header_values(&self) -> &BTreeMap<String, String> {
        &self.headers
    }

    pub fn delivery_tag(&self) -> u64 {
        self.delivery_tag
    }

    pub fn redelivered(&self) -> bool {
        self.redelivered
    }

    /// Acknowledges the delivery, and every earlier one when `multiple` is set.
    pub async fn ack(&self, multiple: bool) -> Result<(), AmqpError> {
        self.acker.ack(multiple).await
    }

    /// Rejects the delivery, optionally asking the broker to requeue it.
    pub async fn nack(&self, multiple: bool, requeue: bool) -> Result<(), AmqpError> {
        self.acker.nack(multiple, requeue).await
    }
}

impl fmt::Debug for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Message")
            .field("exchange", &self.exchange)
            .field("routing_key", &self.routing_key)
            .field("body_len", &self.body.len())
            .field("delivery_tag", &self.delivery_tag)
            .field("redelivered", &self.redelivered)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn settles_through_the_acknowledger() {
        let mut acker = MockAcknowledger::new();
        acker
            .expect_ack()
            .withf(|multiple| *multiple)
            .times(1)
            .returning(|_| Ok(()));
        acker
            .expect_nack()
            .withf(|multiple, requeue| !*multiple && *requeue)
            .times(1)
            .returning(|_, _| Err(AmqpError::NackMessageError));

        let msg = Message::new("events", "db", b"payload".to_vec(), Arc::new(acker))
            .delivery(7, true);

        assert_eq!(msg.body(), b"payload");
        assert_eq!(msg.delivery_tag(), 7);
        assert!(msg.redelivered());
        assert_eq!(msg.ack(true).await, Ok(()));
        assert_eq!(msg.nack(false, true).await, Err(AmqpError::NackMessageError));
    }
}
