// Copyright (c) 2025, The Ruskit Authors
// MIT License
// All rights reserved.

//! # Message Dispatcher
//!
//! Every binding gets one dispatch task that pulls deliveries from its stream
//! and invokes the handler for each of them in arrival order. Tasks share
//! nothing but the handler. They stop when their stream ends or when the stop
//! flag is raised; a handler call in progress always runs to completion.

use crate::{broker::DeliveryStream, handler::ConsumerHandler, otel};
use futures_util::{future::join_all, StreamExt};
use opentelemetry::{
    global,
    trace::{Span, Status},
};
use std::{sync::Arc, time::Duration};
use tokio::{sync::watch, task::JoinHandle};
use tracing::{debug, error, warn};

/// Name of the tracer used for consumer spans
pub const TRACER_NAME: &str = "amqp consumer";

/// The dispatch tasks of a consuming topology.
pub(crate) struct Dispatchers {
    stop: watch::Sender<bool>,
    tasks: Vec<JoinHandle<()>>,
}

impl Dispatchers {
    pub(crate) fn new() -> Self {
        let (stop, _) = watch::channel(false);
        Dispatchers {
            stop,
            tasks: vec![],
        }
    }

    /// Starts the dispatch task of one binding.
    pub(crate) fn spawn(
        &mut self,
        queue: &str,
        mut stream: DeliveryStream,
        handler: Arc<dyn ConsumerHandler>,
    ) {
        let queue = queue.to_owned();
        let mut stop = self.stop.subscribe();

        self.tasks.push(tokio::spawn(async move {
            let tracer = global::tracer(TRACER_NAME);

            loop {
                let next = tokio::select! {
                    biased;
                    _ = stop.changed() => break,
                    next = stream.next() => next,
                };

                match next {
                    Some(Ok(msg)) => {
                        debug!(
                            "received from {} - exchange: {} routing key: {}",
                            queue,
                            msg.exchange(),
                            msg.routing_key()
                        );

                        let (ctx, mut span) =
                            otel::new_span(msg.header_values(), &tracer, &queue);
                        handler.exec(&ctx, msg).await;
                        span.set_status(Status::Ok);
                        span.end();
                    }
                    Some(Err(err)) => {
                        error!(error = err.to_string(), queue = queue.as_str(), "errors consume msg")
                    }
                    None => {
                        debug!("delivery stream of {} closed", queue);
                        break;
                    }
                }
            }
        }));
    }

    pub(crate) fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Raises the stop flag and waits for every task to return.
    ///
    /// Tasks still running after `grace` are aborted.
    pub(crate) async fn drain(self, grace: Duration) {
        if self.stop.send(true).is_err() {
            debug!("no dispatch task left to signal");
        }

        let aborts: Vec<_> = self.tasks.iter().map(|t| t.abort_handle()).collect();

        match tokio::time::timeout(grace, join_all(self.tasks)).await {
            Ok(results) => {
                for res in results {
                    if let Err(err) = res {
                        error!(error = err.to_string(), "dispatch task failed");
                    }
                }
            }
            Err(_) => {
                warn!("dispatch tasks did not finish within {:?}, aborting", grace);
                for abort in aborts {
                    abort.abort();
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        errors::AmqpError,
        message::{Message, MockAcknowledger},
    };
    use futures_util::stream;
    use std::sync::Mutex;
    use tokio::sync::mpsc;

    fn message(routing_key: &str) -> Message {
        Message::new("events", routing_key, vec![], Arc::new(MockAcknowledger::new()))
    }

    #[tokio::test]
    async fn handles_deliveries_in_order_until_the_stream_ends() {
        let seen = Arc::new(Mutex::new(vec![]));
        let sink = seen.clone();
        let handler = move |msg: Message| {
            let sink = sink.clone();
            async move {
                sink.lock().unwrap().push(msg.routing_key().to_owned());
            }
        };

        let deliveries = stream::iter(vec![
            Ok(message("a")),
            Err(AmqpError::ConsumerError("broken frame".to_owned())),
            Ok(message("b")),
            Ok(message("c")),
        ])
        .boxed();

        let mut dispatchers = Dispatchers::new();
        dispatchers.spawn("q", deliveries, Arc::new(handler));
        assert_eq!(dispatchers.len(), 1);

        // the stream is finite so the task ends by itself
        let tasks = std::mem::take(&mut dispatchers.tasks);
        for task in tasks {
            task.await.unwrap();
        }

        assert_eq!(*seen.lock().unwrap(), vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn drain_finishes_in_flight_handler() {
        let (tx, rx) = mpsc::unbounded_channel::<Result<Message, AmqpError>>();
        let deliveries = futures_util::stream::unfold(rx, |mut rx| async move {
            rx.recv().await.map(|item| (item, rx))
        })
        .boxed();

        let (started_tx, mut started_rx) = mpsc::unbounded_channel::<()>();
        let done = Arc::new(Mutex::new(false));
        let finished = done.clone();
        let handler = move |_msg: Message| {
            let started = started_tx.clone();
            let finished = finished.clone();
            async move {
                let _ = started.send(());
                tokio::time::sleep(Duration::from_millis(50)).await;
                *finished.lock().unwrap() = true;
            }
        };

        let mut dispatchers = Dispatchers::new();
        dispatchers.spawn("q", deliveries, Arc::new(handler));

        tx.send(Ok(message("a"))).unwrap();
        started_rx.recv().await.unwrap();

        // the stream never ends on its own, only the stop flag ends the task
        dispatchers.drain(Duration::from_secs(5)).await;
        assert!(*done.lock().unwrap());
    }

    #[tokio::test]
    async fn drain_without_tasks_returns() {
        let dispatchers = Dispatchers::new();
        assert_eq!(dispatchers.len(), 0);

        dispatchers.drain(Duration::from_millis(10)).await;
    }

    #[tokio::test]
    async fn drain_aborts_after_grace() {
        let handler = |_msg: Message| async move {
            tokio::time::sleep(Duration::from_secs(3600)).await;
        };

        let mut dispatchers = Dispatchers::new();
        dispatchers.spawn(
            "q",
            stream::iter(vec![Ok(message("a"))]).chain(stream::pending()).boxed(),
            Arc::new(handler),
        );

        tokio::time::sleep(Duration::from_millis(10)).await;
        let started = tokio::time::Instant::now();
        dispatchers.drain(Duration::from_millis(50)).await;
        assert!(started.elapsed() < Duration::from_secs(5));
    }
}
