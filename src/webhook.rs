//! Best effort webhook delivery for fired alarms.
//!
//! Requests are handed to a single worker thread so a slow endpoint never stalls the clock. A
//! failed request is logged and dropped.

use std::{
    sync::mpsc::{self, Receiver, Sender},
    thread::{self, JoinHandle},
    time::Duration,
};

use chrono::{DateTime, SecondsFormat, TimeZone, Utc};
use log::{debug, error, info};
use reqwest::blocking::Client;
use serde::Serialize;

use crate::{
    alarm::{Alarm, AlarmId},
    communication::{Message, MessageType},
    error::WebhookError,
};

/// `event` field of every webhook body
pub const ALARM_EVENT: &str = "clock_alarm";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookPayload {
    pub event: String,
    /// ISO-8601, UTC with milliseconds
    pub time: String,
    pub alarm_id: AlarmId,
    pub label: Option<String>,
}

impl WebhookPayload {
    #[must_use]
    pub fn new(alarm: &Alarm, fired_at: DateTime<Utc>) -> Self {
        Self {
            event: ALARM_EVENT.to_string(),
            time: fired_at.to_rfc3339_opts(SecondsFormat::Millis, true),
            alarm_id: alarm.id,
            label: alarm.label.clone(),
        }
    }
}

/// POSTs `payload` as json, anything but a 2xx is an error
pub fn post(client: &Client, url: &str, payload: &WebhookPayload) -> Result<(), WebhookError> {
    let response = client.post(url).json(payload).send()?;
    let status = response.status();
    if status.is_success() {
        Ok(())
    } else {
        Err(WebhookError::Status(status))
    }
}

/// handle to the webhook worker thread
///
/// dropping it closes the channel and waits for queued requests to finish
#[derive(Debug)]
pub struct Dispatcher {
    sender: Option<Sender<Message>>,
    worker: Option<JoinHandle<()>>,
}

impl Dispatcher {
    #[must_use]
    pub fn spawn(timeout: Duration) -> Self {
        let (sender, receiver) = mpsc::channel();
        let worker = thread::Builder::new()
            .name("webhooks".to_string())
            .spawn(move || run(&receiver, timeout));
        match worker {
            Ok(worker) => Self {
                sender: Some(sender),
                worker: Some(worker),
            },
            Err(e) => {
                error!("couldn't start webhook worker, webhooks are disabled: {e}");
                Self {
                    sender: None,
                    worker: None,
                }
            }
        }
    }

    /// Queues the webhook of a fired alarm, returns whether there was one to send.
    pub fn dispatch<Tz: TimeZone>(&self, alarm: &Alarm, fired_at: &DateTime<Tz>) -> bool {
        let Some(url) = &alarm.webhook_url else {
            return false;
        };
        let message = Message::new(
            MessageType::WebhookRequested {
                url: url.clone(),
                payload: WebhookPayload::new(alarm, fired_at.with_timezone(&Utc)),
            },
            alarm.id,
        );
        let sent = self
            .sender
            .as_ref()
            .is_some_and(|sender| sender.send(message).is_ok());
        if !sent {
            error!("webhook worker is not running, dropping webhook for alarm {}", alarm.id);
        }
        sent
    }

    /// Stops the worker after it has sent everything already queued.
    pub fn shutdown(mut self) {
        self.stop();
    }

    fn stop(&mut self) {
        drop(self.sender.take());
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                error!("webhook worker panicked");
            }
        }
    }
}

impl Drop for Dispatcher {
    fn drop(&mut self) {
        self.stop();
    }
}

fn run(receiver: &Receiver<Message>, timeout: Duration) {
    // the client owns its own runtime so it has to be built (and dropped) off any async context
    let client = match Client::builder().timeout(timeout).build() {
        Ok(client) => client,
        Err(e) => {
            error!("couldn't create webhook client: {e}");
            return;
        }
    };
    // ends once every sender is dropped
    while let Ok(Message { kind, alarm_id }) = receiver.recv() {
        match kind {
            MessageType::WebhookRequested { url, payload } => {
                debug!("sending webhook for alarm {alarm_id} to {url}");
                match post(&client, &url, &payload) {
                    Ok(()) => info!("webhook for alarm {alarm_id} sent"),
                    Err(e) => error!("webhook for alarm {alarm_id} to {url} failed: {e}"),
                }
            }
        }
    }
    debug!("webhook worker stopped");
}
