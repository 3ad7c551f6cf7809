// Copyright (c) 2025, The Ruskit Authors
// MIT License
// All rights reserved.

//! # Message Handlers
//!
//! The handler is the user code invoked for every delivery. It owns the
//! acknowledgement of the message it receives.

use crate::message::Message;
use async_trait::async_trait;
use opentelemetry::Context;
use std::future::Future;

/// Processes messages delivered to any queue of the topology.
#[async_trait]
pub trait ConsumerHandler: Send + Sync {
    /// Handles one delivery. `ctx` carries the trace context of the message.
    async fn exec(&self, ctx: &Context, msg: Message);
}

/// Plain async closures taking a `Message` can be used as handlers.
#[async_trait]
impl<F, Fut> ConsumerHandler for F
where
    F: Fn(Message) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    async fn exec(&self, _ctx: &Context, msg: Message) {
        (self)(msg).await
    }
}
