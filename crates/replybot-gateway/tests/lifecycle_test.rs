use std::fs;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use replybot_channels::{Channel, ChannelEvent, ChannelStatus, OnMessageFn};
use replybot_common::{ChannelId, Error, IncomingMessage, Result, UserId};
use replybot_config::{ConfigLoader, ConfigStore};
use replybot_gateway::ReplyBot;
use tokio::sync::{broadcast, oneshot};

const BOT_ID: &str = "999";

/// In-memory channel that feeds messages straight into the bot's callback and
/// records what the bot sent back.
struct MockChannel {
    on_message: OnMessageFn,
    event_tx: broadcast::Sender<ChannelEvent>,
    status: ChannelStatus,
    fail_connect: bool,
    disconnected: Arc<AtomicBool>,
    sent: Arc<Mutex<Vec<(String, String)>>>,
}

impl MockChannel {
    fn new(on_message: OnMessageFn) -> Self {
        let (event_tx, _) = broadcast::channel(16);
        Self {
            on_message,
            event_tx,
            status: ChannelStatus::Disconnected,
            fail_connect: false,
            disconnected: Arc::new(AtomicBool::new(false)),
            sent: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Deliver a message the way a real gateway would, sending any reply.
    async fn deliver(&self, author: &str, text: &str) {
        let msg = IncomingMessage::text(
            ChannelId::from_string("42"),
            UserId::from_string(author),
            text,
        );
        let channel_id = msg.channel_id.clone();
        if let Some(reply) = (self.on_message)(UserId::from_string(BOT_ID), msg).await {
            self.send_text(&channel_id, &reply)
                .await
                .expect("mock send never fails");
        }
    }
}

#[async_trait]
impl Channel for MockChannel {
    fn channel_type(&self) -> &str {
        "mock"
    }

    fn display_name(&self) -> &str {
        "Mock"
    }

    async fn connect(&mut self) -> Result<()> {
        if self.fail_connect {
            return Err(Error::Channel("connection refused".into()));
        }
        self.status = ChannelStatus::Connected;
        Ok(())
    }

    async fn disconnect(&mut self) -> Result<()> {
        self.status = ChannelStatus::Disconnected;
        self.disconnected.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn send_text(&self, channel_id: &ChannelId, text: &str) -> Result<()> {
        self.sent
            .lock()
            .expect("sent log poisoned")
            .push((channel_id.to_string(), text.to_string()));
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<ChannelEvent> {
        self.event_tx.subscribe()
    }

    fn status(&self) -> ChannelStatus {
        self.status.clone()
    }
}

fn open_store(dir: &tempfile::TempDir, yaml: &str) -> Arc<ConfigStore> {
    let path = dir.path().join("config.yaml");
    fs::write(&path, yaml).expect("failed to write config");
    Arc::new(ConfigStore::open(ConfigLoader::with_path(path)).expect("config should load"))
}

#[tokio::test]
async fn replies_go_back_to_the_originating_channel() {
    let dir = tempfile::tempdir().expect("temp dir");
    let store = open_store(
        &dir,
        "commands:\n  \"!ping\": pong\napproved_only: true\nids: [\"1\"]\n",
    );
    let bot = ReplyBot::new(store);
    let channel = MockChannel::new(bot.on_message_fn());

    channel.deliver("1", "!ping").await;
    channel.deliver("2", "!ping").await;
    channel.deliver("1", "!nope").await;
    channel.deliver(BOT_ID, "!ping").await;

    let sent = channel.sent.lock().expect("sent log poisoned").clone();
    assert_eq!(sent, vec![("42".to_string(), "pong".to_string())]);
}

#[tokio::test]
async fn shutdown_disconnects_channel() {
    let dir = tempfile::tempdir().expect("temp dir");
    let bot = ReplyBot::new(open_store(&dir, "commands:\n  \"!ping\": pong\n"));
    let channel = MockChannel::new(bot.on_message_fn());
    let disconnected = Arc::clone(&channel.disconnected);

    let (stop_tx, stop_rx) = oneshot::channel::<()>();
    let run = tokio::spawn(bot.run_until(Box::new(channel), async {
        let _ = stop_rx.await;
    }));

    stop_tx.send(()).expect("bot should still be running");
    tokio::time::timeout(Duration::from_secs(5), run)
        .await
        .expect("bot should stop in time")
        .expect("run task should not panic")
        .expect("run should succeed");

    assert!(disconnected.load(Ordering::SeqCst));
}

#[tokio::test]
async fn channel_error_ends_the_run() {
    let dir = tempfile::tempdir().expect("temp dir");
    let bot = ReplyBot::new(open_store(&dir, "commands:\n  \"!ping\": pong\n"));
    let channel = MockChannel::new(bot.on_message_fn());
    let event_tx = channel.event_tx.clone();
    let disconnected = Arc::clone(&channel.disconnected);

    let run = tokio::spawn(bot.run_until(Box::new(channel), std::future::pending::<()>()));

    // Keep emitting until the run loop has subscribed and seen the error.
    let stopped = tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            let _ = event_tx.send(ChannelEvent::Error("invalid token".into()));
            if run.is_finished() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await;

    assert!(stopped.is_ok(), "run should end after a channel error");
    assert!(disconnected.load(Ordering::SeqCst));
}

#[tokio::test]
async fn failed_connect_returns_without_error() {
    let dir = tempfile::tempdir().expect("temp dir");
    let bot = ReplyBot::new(open_store(&dir, "commands:\n  \"!ping\": pong\n"));
    let mut channel = MockChannel::new(bot.on_message_fn());
    channel.fail_connect = true;
    let disconnected = Arc::clone(&channel.disconnected);

    bot.run_until(Box::new(channel), std::future::pending::<()>())
        .await
        .expect("connect failure is logged, not returned");

    assert!(!disconnected.load(Ordering::SeqCst));
}

#[tokio::test]
async fn config_watch_reloads_on_file_change() {
    let dir = tempfile::tempdir().expect("temp dir");
    let store = open_store(&dir, "commands:\n  \"!v\": one\n");
    let mut updates = store.subscribe();
    let bot = ReplyBot::new(Arc::clone(&store)).with_config_watch(true);
    let channel = MockChannel::new(bot.on_message_fn());

    let (stop_tx, stop_rx) = oneshot::channel::<()>();
    let run = tokio::spawn(bot.run_until(Box::new(channel), async {
        let _ = stop_rx.await;
    }));

    // Rewrite until the watcher (started inside run_until) picks it up.
    let reloaded = tokio::time::timeout(Duration::from_secs(10), async {
        loop {
            fs::write(dir.path().join("config.yaml"), "commands:\n  \"!v\": two\n")
                .expect("failed to rewrite config");
            if tokio::time::timeout(Duration::from_millis(200), updates.changed())
                .await
                .is_ok()
            {
                break;
            }
        }
    })
    .await;

    let _ = stop_tx.send(());
    run.await
        .expect("run task should not panic")
        .expect("run should succeed");

    assert!(reloaded.is_ok(), "file change should trigger a reload");
    assert_eq!(store.current().reply_for("!v"), Some("two"));
}
