//! Discord adapter built on serenity.
//!
//! Forwards message-create and message-update events to the inbound bus and
//! implements `PlatformConnection` over the REST client.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};

use async_trait::async_trait;
use buzzbot_core::{BotError, IncomingMessage, PinnedMessage, PlatformConnection, Result};
use serenity::all::{
    ChannelId, Client, ConnectionStage, Context, EventHandler, GatewayIntents, Http, Message,
    MessageUpdateEvent, Ready, ShardManager, ShardStageUpdateEvent, User, UserId,
};
use tokio::sync::{Mutex, mpsc};
use tracing::{debug, error, info};

use crate::ChannelAdapter;

/// Discord rejects messages longer than this many characters.
pub const DISCORD_MESSAGE_LIMIT: usize = 2000;

struct Handler {
    inbound_tx: mpsc::Sender<IncomingMessage>,
    bot_user_id: Arc<OnceLock<String>>,
    connected: Arc<AtomicBool>,
}

impl Handler {
    async fn forward(&self, message: IncomingMessage) {
        if self.inbound_tx.send(message).await.is_err() {
            error!("Inbound bus closed; dropping Discord message");
        }
    }
}

#[async_trait]
impl EventHandler for Handler {
    async fn message(&self, _ctx: Context, msg: Message) {
        debug!(channel = %msg.channel_id, author = %msg.author.id, "Discord message received");
        self.forward(IncomingMessage::created(
            msg.channel_id.to_string(),
            msg.author.id.to_string(),
            display_name(&msg.author),
            msg.content,
        ))
        .await;
    }

    async fn message_update(
        &self,
        _ctx: Context,
        _old_if_available: Option<Message>,
        new: Option<Message>,
        event: MessageUpdateEvent,
    ) {
        // Embed-only updates carry no content.
        let Some(content) = event.content else { return };
        let Some(author) = event.author.or_else(|| new.map(|m| m.author)) else {
            debug!(channel = %event.channel_id, "Edited message without author; skipping");
            return;
        };
        self.forward(IncomingMessage::updated(
            event.channel_id.to_string(),
            author.id.to_string(),
            display_name(&author),
            content,
        ))
        .await;
    }

    async fn ready(&self, _ctx: Context, ready: Ready) {
        let _ = self.bot_user_id.set(ready.user.id.to_string());
        self.connected.store(true, Ordering::SeqCst);
        info!("{} is connected!", ready.user.name);
    }

    async fn shard_stage_update(&self, _ctx: Context, event: ShardStageUpdateEvent) {
        let connected = event.new == ConnectionStage::Connected;
        self.connected.store(connected, Ordering::SeqCst);
        debug!(stage = ?event.new, "Discord shard stage changed");
    }
}

fn display_name(user: &User) -> String {
    user.name.clone()
}

fn parse_id(raw: &str) -> Option<u64> {
    raw.parse::<u64>().ok().filter(|id| *id != 0)
}

/// Split `content` into chunks of at most `limit` characters, preferring
/// line boundaries.
pub fn split_message(content: &str, limit: usize) -> Vec<String> {
    if content.chars().count() <= limit {
        return vec![content.to_string()];
    }

    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for line in content.split_inclusive('\n') {
        let line_len = line.chars().count();
        if current_len + line_len > limit && !current.is_empty() {
            chunks.push(std::mem::take(&mut current));
            current_len = 0;
        }
        if line_len > limit {
            let chars: Vec<char> = line.chars().collect();
            for piece in chars.chunks(limit) {
                chunks.push(piece.iter().collect());
            }
            continue;
        }
        current.push_str(line);
        current_len += line_len;
    }
    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}

pub struct DiscordAdapter {
    token: String,
    http: Arc<Http>,
    bot_user_id: Arc<OnceLock<String>>,
    connected: Arc<AtomicBool>,
    shard_manager: Mutex<Option<Arc<ShardManager>>>,
}

impl DiscordAdapter {
    pub fn new(token: String) -> Self {
        let http = Arc::new(Http::new(&token));
        Self {
            token,
            http,
            bot_user_id: Arc::new(OnceLock::new()),
            connected: Arc::new(AtomicBool::new(false)),
            shard_manager: Mutex::new(None),
        }
    }

    /// Shared connection flag, for health reporting.
    pub fn connected_flag(&self) -> Arc<AtomicBool> {
        self.connected.clone()
    }

    fn channel(&self, channel_id: &str) -> Option<ChannelId> {
        parse_id(channel_id).map(ChannelId::new)
    }
}

#[async_trait]
impl ChannelAdapter for DiscordAdapter {
    fn name(&self) -> &str {
        "discord"
    }

    async fn start(&self, inbound_tx: mpsc::Sender<IncomingMessage>) -> anyhow::Result<()> {
        info!("Starting Discord adapter");

        let me = self
            .http
            .get_current_user()
            .await
            .map_err(|e| anyhow::anyhow!("Could not fetch Discord bot identity: {e}"))?;
        let _ = self.bot_user_id.set(me.id.to_string());
        info!(bot_user_id = %me.id, "Discord identity resolved");

        let intents = GatewayIntents::GUILD_MESSAGES
            | GatewayIntents::DIRECT_MESSAGES
            | GatewayIntents::MESSAGE_CONTENT;

        let handler = Handler {
            inbound_tx,
            bot_user_id: self.bot_user_id.clone(),
            connected: self.connected.clone(),
        };
        let mut client = Client::builder(&self.token, intents)
            .event_handler(handler)
            .await?;
        *self.shard_manager.lock().await = Some(client.shard_manager.clone());

        if let Err(why) = client.start().await {
            error!("Client error: {:?}", why);
            self.connected.store(false, Ordering::SeqCst);
            anyhow::bail!("Discord client error: {:?}", why);
        }

        self.connected.store(false, Ordering::SeqCst);
        Ok(())
    }

    async fn shutdown(&self) {
        if let Some(manager) = self.shard_manager.lock().await.take() {
            manager.shutdown_all().await;
            info!("Discord session closed");
        }
        self.connected.store(false, Ordering::SeqCst);
    }

    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PlatformConnection for DiscordAdapter {
    fn name(&self) -> &str {
        "discord"
    }

    fn bot_user_id(&self) -> Option<String> {
        self.bot_user_id.get().cloned()
    }

    async fn send_message(&self, channel_id: &str, content: &str) -> Result<()> {
        let channel = self
            .channel(channel_id)
            .ok_or_else(|| BotError::send(channel_id, "invalid channel id"))?;
        for chunk in split_message(content, DISCORD_MESSAGE_LIMIT) {
            channel
                .say(&self.http, chunk)
                .await
                .map_err(|e| BotError::send(channel_id, e))?;
        }
        Ok(())
    }

    async fn pinned_messages(&self, channel_id: &str) -> Result<Vec<PinnedMessage>> {
        let channel = self
            .channel(channel_id)
            .ok_or_else(|| BotError::upstream("discord", format!("invalid channel id {channel_id:?}")))?;
        let pins = channel
            .pins(&self.http)
            .await
            .map_err(|e| BotError::upstream("discord", format!("no pinned messages: {e}")))?;

        Ok(pins
            .into_iter()
            .map(|m| PinnedMessage {
                author_display_name: display_name(&m.author),
                attachments: m.attachments.into_iter().map(|a| a.url).collect(),
                content: m.content,
            })
            .collect())
    }

    async fn resolve_display_name(&self, user_id: &str) -> Result<String> {
        let id = parse_id(user_id)
            .ok_or_else(|| BotError::upstream("discord", format!("invalid user id {user_id:?}")))?;
        let user = self
            .http
            .get_user(UserId::new(id))
            .await
            .map_err(|e| BotError::upstream("discord", e))?;
        Ok(display_name(&user))
    }
}
