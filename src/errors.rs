// Copyright (c) 2025, The Ruskit Authors
// MIT License
// All rights reserved.

//! # Error Types for the RabbitMQ Consumer
//!
//! This module provides the error type shared by every stage of the consumer:
//! reading the configuration snapshot, building the topology, declaring it on
//! the broker, consuming and shutting down. Configuration and topology errors
//! are produced synchronously during construction, broker errors abort the
//! phase in which they happened.

use thiserror::Error;

/// Represents errors that can occur while building or running a consumer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AmqpError {
    /// A required configuration section is absent
    #[error("missing `{0}` section in configuration")]
    MissingSection(String),

    /// An exchange or queue section has no `name` option
    #[error("missing name from `{0}` section")]
    MissingName(String),

    /// A requested option is absent from its section
    #[error("missing option `{1}` in section `{0}`")]
    MissingOption(String, String),

    /// An option is present but its value can not be read as the expected type
    #[error("invalid value `{value}` for option `{key}` in section `{section}`")]
    InvalidOption {
        section: String,
        key: String,
        value: String,
    },

    /// The configuration file could not be read or parsed
    #[error("failure to read configuration: {0}")]
    ConfigFileError(String),

    /// The number of queue sections differs from the number of exchange sections
    #[error("exchange and queue counts do not match, got queues {queues:?} and exchanges {exchanges:?}")]
    BindingCountMismatch {
        queues: Vec<String>,
        exchanges: Vec<String>,
    },

    /// Queue and exchange sections are equally many but their suffixes differ
    #[error("exchange and queue names do not match, got queues {queues:?} and exchanges {exchanges:?}")]
    BindingNameMismatch {
        queues: Vec<String>,
        exchanges: Vec<String>,
    },

    /// Two bindings derive the same consumer tag
    #[error("consumer tag `{0}` is used by more than one binding")]
    DuplicateConsumerTag(String),

    /// Error establishing a connection to the RabbitMQ server
    #[error("failure to connect: {0}")]
    ConnectionError(String),

    /// Error creating a channel from an established connection
    #[error("failure to create a channel: {0}")]
    ChannelError(String),

    /// Error declaring an exchange with the given name
    #[error("failure to declare an exchange `{0}`")]
    DeclareExchangeError(String),

    /// Error declaring a queue with the given name
    #[error("failure to declare a queue `{0}`")]
    DeclareQueueError(String),

    /// Error binding a queue to an exchange
    #[error("failure to bind queue `{1}` to exchange `{0}`")]
    BindingExchangeToQueueError(String, String),

    /// Error opening a delivery stream for a queue
    #[error("failure to declare consumer `{0}`")]
    BindingConsumerError(String),

    /// Error cancelling a delivery stream by its tag
    #[error("failure to cancel consumer `{0}`")]
    CancellationError(String),

    /// The operation is not allowed in the current lifecycle state
    #[error("invalid consumer state: {0}")]
    InvalidState(String),

    /// Error receiving a delivery
    #[error("failure to consume message `{0}`")]
    ConsumerError(String),

    /// Error acknowledging a message
    #[error("failure to ack message")]
    AckMessageError,

    /// Error negative-acknowledging a message
    #[error("failure to nack message")]
    NackMessageError,
}
