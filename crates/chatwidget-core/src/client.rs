use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, error, warn};

use crate::api::ChatApi;
use crate::state::Sender;
use crate::view::ChatView;

/// Shown as a bot message when a chat request fails
pub const CONNECTION_ERROR_TEXT: &str = "⚠️ Error connecting to the server.";

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(3000);

/// The running scheduler poll timer. Aborted when dropped.
#[derive(Debug)]
pub struct PollHandle {
    task: JoinHandle<()>,
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Chat client: sends user input to the server and polls for scheduler
/// results, rendering everything into one shared [`ChatView`].
pub struct ChatClient {
    api: ChatApi,
    view: Arc<ChatView>,
    poll_interval: Duration,
    poller: Mutex<Option<PollHandle>>,
}

impl ChatClient {
    pub fn new(api: ChatApi) -> Self {
        Self::with_poll_interval(api, DEFAULT_POLL_INTERVAL)
    }

    pub fn with_poll_interval(api: ChatApi, poll_interval: Duration) -> Self {
        Self {
            api,
            view: Arc::new(ChatView::new()),
            poll_interval,
            poller: Mutex::new(None),
        }
    }

    pub fn view(&self) -> &Arc<ChatView> {
        &self.view
    }

    pub fn api(&self) -> &ChatApi {
        &self.api
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// Send whatever is in `input`.
    ///
    /// Blank input is left alone and nothing is sent. Otherwise the text is
    /// rendered as a user message, `input` is cleared and the request runs in
    /// the background; the returned handle resolves once the reply (or the
    /// error notice) has been rendered.
    pub fn send_message(&self, input: &mut String) -> Option<JoinHandle<()>> {
        let text = input.trim().to_string();
        if text.is_empty() {
            return None;
        }

        self.view.render(&text, Sender::User);
        input.clear();
        let pending = self.view.pending().begin();

        let api = self.api.clone();
        let view = Arc::clone(&self.view);
        Some(tokio::spawn(async move {
            let result = api.send_chat(&text).await;
            drop(pending);

            match result {
                Ok(reply) => {
                    if let Some(reply_text) = reply.text() {
                        view.render(&reply_text, Sender::Bot);
                    } else {
                        debug!("chat reply had no responses field");
                    }
                }
                Err(e) => {
                    error!(error = %e, "chat request failed");
                    view.render(CONNECTION_ERROR_TEXT, Sender::Bot);
                }
            }
        }))
    }

    /// Arm the scheduler poll timer. Returns `false` if it was already running.
    pub fn start_polling(&self) -> bool {
        let mut poller = self.poller.lock().unwrap_or_else(PoisonError::into_inner);
        if poller.is_some() {
            debug!("scheduler polling already active");
            return false;
        }

        let api = self.api.clone();
        let view = Arc::clone(&self.view);
        let period = self.poll_interval;
        let task = tokio::spawn(async move {
            let mut interval = time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                poll_results(&api, &view).await;
            }
        });

        debug!(period_ms = period.as_millis() as u64, "scheduler polling started");
        *poller = Some(PollHandle { task });
        true
    }

    /// Cancel the poll timer. Returns `false` if it wasn't running.
    pub fn stop_polling(&self) -> bool {
        let handle = self.poller.lock().unwrap_or_else(PoisonError::into_inner).take();
        match handle {
            Some(handle) => {
                drop(handle);
                debug!("scheduler polling stopped");
                true
            }
            None => false,
        }
    }

    pub fn is_polling(&self) -> bool {
        self.poller
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// One poll tick: fetch scheduler results and render each one.
    pub async fn poll_once(&self) {
        poll_results(&self.api, &self.view).await;
    }
}

async fn poll_results(api: &ChatApi, view: &ChatView) {
    match api.fetch_results().await {
        Ok(results) => {
            for entry in results.entries() {
                view.render(&entry, Sender::Bot);
            }
        }
        // never surfaced in the chat
        Err(e) => warn!(error = %e, "scheduler poll failed"),
    }
}
