// Copyright (c) 2025, The Ruskit Authors
// MIT License
// All rights reserved.

mod dispatcher;
mod otel;

pub mod broker;
pub mod channel;
pub mod config;
pub mod connection;
pub mod consumer;
pub mod errors;
pub mod exchange;
pub mod handler;
pub mod message;
pub mod queue;
pub mod shutdown;
pub mod topology;

pub use consumer::{Consumer, ConsumerState};
pub use errors::AmqpError;
