//! Event loop driving [`ArticleListState`].
//!
//! # Responsibility
//! - Own the state on one tokio task; it is the only mutator.
//! - Debounce search input and issue fetches as spawned tasks.
//! - Publish a fresh [`ArticleListView`] after every change.
//!
//! # Invariants
//! - Fetch tasks never touch the state; they post `FetchSettled` back.
//! - A superseded fetch runs to completion and is discarded on arrival.

use crate::config::ClientConfig;
use crate::error::{ClientError, TransportError, TransportResult};
use crate::source::ArticleSource;
use crate::state::{ArticleListState, ArticleListView, FetchPayload, FetchTicket, SettleOutcome};
use log::{debug, info, warn};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{sleep_until, timeout, Instant};

#[derive(Debug)]
enum Command {
    SetSearchText(String),
    SelectCategory(String),
    Refresh,
}

#[derive(Debug)]
struct FetchSettled {
    seq: u64,
    result: TransportResult<FetchPayload>,
}

/// Handle to a running article list controller.
///
/// Dropping the handle stops the controller once its command queue drains.
#[derive(Debug)]
pub struct ArticleListHandle {
    commands: mpsc::UnboundedSender<Command>,
    view: watch::Receiver<ArticleListView>,
    task: JoinHandle<()>,
}

impl ArticleListHandle {
    /// Records a search keystroke; the fetch follows after the debounce.
    pub fn set_search_text(&self, text: impl Into<String>) -> Result<(), ClientError> {
        self.send(Command::SetSearchText(text.into()))
    }

    /// Selects a category and fetches immediately.
    pub fn select_category(&self, name: impl Into<String>) -> Result<(), ClientError> {
        self.send(Command::SelectCategory(name.into()))
    }

    /// Re-runs the current filter immediately.
    pub fn refresh(&self) -> Result<(), ClientError> {
        self.send(Command::Refresh)
    }

    /// Latest published view.
    pub fn snapshot(&self) -> ArticleListView {
        self.view.borrow().clone()
    }

    /// Receiver notified on every published view.
    pub fn subscribe(&self) -> watch::Receiver<ArticleListView> {
        self.view.clone()
    }

    /// Stops accepting commands and waits for the loop to exit.
    pub async fn shutdown(self) {
        let Self { commands, task, .. } = self;
        drop(commands);
        if let Err(err) = task.await {
            warn!("event=article_list_shutdown module=client status=error error={err}");
        }
    }

    fn send(&self, command: Command) -> Result<(), ClientError> {
        self.commands
            .send(command)
            .map_err(|_| ClientError::ControllerStopped)
    }
}

/// Spawns the controller on the current tokio runtime and issues the initial
/// (mount) fetch.
pub fn spawn_article_list<S: ArticleSource>(
    source: S,
    config: &ClientConfig,
) -> ArticleListHandle {
    let state = ArticleListState::new();
    let (view_tx, view_rx) = watch::channel(state.view().clone());
    let (command_tx, command_rx) = mpsc::unbounded_channel();
    let (settled_tx, settled_rx) = mpsc::unbounded_channel();

    let controller = Controller {
        state,
        source: Arc::new(source),
        view: view_tx,
        settled_tx,
        debounce: config.search_debounce,
        timeout: config.timeout,
        search_deadline: None,
    };
    let task = tokio::spawn(controller.run(command_rx, settled_rx));

    ArticleListHandle {
        commands: command_tx,
        view: view_rx,
        task,
    }
}

struct Controller<S> {
    state: ArticleListState,
    source: Arc<S>,
    view: watch::Sender<ArticleListView>,
    settled_tx: mpsc::UnboundedSender<FetchSettled>,
    debounce: Duration,
    timeout: Duration,
    search_deadline: Option<Instant>,
}

impl<S: ArticleSource> Controller<S> {
    async fn run(
        mut self,
        mut commands: mpsc::UnboundedReceiver<Command>,
        mut settled: mpsc::UnboundedReceiver<FetchSettled>,
    ) {
        info!("event=article_list_start module=client status=ok");
        self.issue_fetch();

        loop {
            let deadline = self.search_deadline;
            tokio::select! {
                command = commands.recv() => match command {
                    Some(command) => self.on_command(command),
                    None => break,
                },
                Some(event) = settled.recv() => self.on_settled(event),
                _ = wait_for_deadline(deadline) => {
                    self.search_deadline = None;
                    self.issue_fetch();
                }
            }
        }

        info!(
            "event=article_list_stop module=client status=ok latest_seq={}",
            self.state.latest_seq()
        );
    }

    fn on_command(&mut self, command: Command) {
        match command {
            Command::SetSearchText(text) => {
                self.state.set_search_text(text);
                self.search_deadline = Some(Instant::now() + self.debounce);
                self.publish();
            }
            Command::SelectCategory(name) => {
                self.state.select_category(name);
                // A pending search joins this fetch.
                self.search_deadline = None;
                self.issue_fetch();
            }
            Command::Refresh => {
                self.search_deadline = None;
                self.issue_fetch();
            }
        }
    }

    fn on_settled(&mut self, event: FetchSettled) {
        let FetchSettled { seq, result } = event;
        match self.state.settle(seq, result) {
            SettleOutcome::Committed => {
                debug!(
                    "event=article_fetch module=client status=ok seq={} count={}",
                    seq,
                    self.state.view().articles.len()
                );
            }
            SettleOutcome::Failed(err) => {
                warn!("event=article_fetch module=client status=error seq={seq} error={err}");
            }
            SettleOutcome::Superseded => {
                debug!(
                    "event=article_fetch module=client status=discarded seq={} latest_seq={}",
                    seq,
                    self.state.latest_seq()
                );
                return;
            }
        }
        self.publish();
    }

    fn issue_fetch(&mut self) {
        let FetchTicket { seq, filter } = self.state.begin_fetch();
        debug!(
            "event=article_fetch module=client status=start seq={} category={:?} search={:?}",
            seq, filter.category, filter.search
        );
        self.publish();

        let source = Arc::clone(&self.source);
        let settled_tx = self.settled_tx.clone();
        let limit = self.timeout;
        tokio::spawn(async move {
            let load = async {
                let (articles, categories) = tokio::try_join!(
                    source.fetch_articles(&filter),
                    source.fetch_categories()
                )?;
                Ok::<_, TransportError>(FetchPayload {
                    articles,
                    categories,
                })
            };
            let result = match timeout(limit, load).await {
                Ok(result) => result,
                Err(_) => Err(TransportError::Timeout),
            };
            // The loop is gone when this fails; nothing left to update.
            let _ = settled_tx.send(FetchSettled { seq, result });
        });
    }

    fn publish(&self) {
        self.view.send_replace(self.state.view().clone());
    }
}

async fn wait_for_deadline(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}
