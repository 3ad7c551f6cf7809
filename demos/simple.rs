// Copyright (c) 2025, The Ruskit Authors
// MIT License
// All rights reserved.

//! Consumes every queue described by an INI file and logs each message.
//!
//! ```text
//! cargo run --example simple -- --config ./demos/simple.ini
//! ```

use clap::Parser;
use rabbitmq_consumer::{message::Message, shutdown::shutdown_signal, Consumer};
use std::time::Duration;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
struct Args {
    /// The configuration file to use
    #[arg(long, default_value = "./simple.ini")]
    config: String,
}

async fn worker(msg: Message) {
    info!(
        "message received exchange: {}, routing key: {}, body: {}",
        msg.exchange(),
        msg.routing_key(),
        String::from_utf8_lossy(msg.body())
    );

    if let Err(err) = msg.ack(false).await {
        error!(error = err.to_string(), "failure to ack message");
    }

    tokio::time::sleep(Duration::from_millis(1000)).await;
    info!("sleep complete");
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    let mut consumer = match Consumer::from_file(&args.config) {
        Ok(c) => c,
        Err(err) => {
            error!(error = err.to_string(), "unable to create consumer");
            std::process::exit(1);
        }
    };

    if let Err(err) = consumer.consume(worker, shutdown_signal()).await {
        error!(error = err.to_string(), "unable to consume messages");
        std::process::exit(1);
    }
}
