// Discord REST adapter - Posts tracker embeds with action buttons to one channel
use crate::application::notification_sink::NotificationSink;
use crate::application::renderer::ActionSet;
use crate::domain::error::DeliveryError;
use crate::domain::notification::{MessageBody, NotificationId};
use async_trait::async_trait;
use serde_json::{json, Value};

const ACTION_ROW: u8 = 1;
const BUTTON: u8 = 2;
const BUTTON_STYLE_SUCCESS: u8 = 3;
const CHAT_INPUT_COMMAND: u8 = 1;
/// Discord rejects embed field values that are empty or longer than this.
const FIELD_VALUE_LIMIT: usize = 1024;
const EMPTY_FIELD_VALUE: &str = "-";

pub const PING_COMMAND: &str = "ping";

#[derive(Debug, Clone)]
pub struct DiscordChannel {
    client: reqwest::Client,
    api_base: String,
    token: Option<String>,
    channel_id: Option<String>,
}

impl DiscordChannel {
    pub fn new(
        client: reqwest::Client,
        api_base: String,
        token: Option<String>,
        channel_id: Option<String>,
    ) -> Self {
        Self {
            client,
            api_base: api_base.trim_end_matches('/').to_string(),
            token: token.filter(|t| !t.is_empty()),
            channel_id: channel_id.filter(|c| !c.is_empty()),
        }
    }

    /// Overwrites the bot's application commands. Scoped to one guild when
    /// `guild_id` is given, so changes show up immediately there.
    pub async fn register_commands(
        &self,
        application_id: &str,
        guild_id: Option<&str>,
    ) -> Result<(), DeliveryError> {
        let token = self
            .token
            .as_deref()
            .ok_or(DeliveryError::NotConfigured("discord.token"))?;

        let url = match guild_id {
            Some(guild) => format!(
                "{}/applications/{}/guilds/{}/commands",
                self.api_base, application_id, guild
            ),
            None => format!("{}/applications/{}/commands", self.api_base, application_id),
        };
        let response = self
            .client
            .put(&url)
            .header("Authorization", format!("Bot {}", token))
            .json(&commands_payload())
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(DeliveryError::Rejected { status, body });
        }

        tracing::info!(
            application = application_id,
            guild = ?guild_id,
            "Registered application commands"
        );
        Ok(())
    }
}

fn commands_payload() -> Value {
    json!([{
        "name": PING_COMMAND,
        "description": "Check that the tracker bot is listening",
        "type": CHAT_INPUT_COMMAND,
    }])
}

/// Fits a value into an embed field: never empty, at most `FIELD_VALUE_LIMIT` chars.
fn field_value(value: &str) -> String {
    if value.trim().is_empty() {
        return EMPTY_FIELD_VALUE.to_string();
    }
    match value.char_indices().nth(FIELD_VALUE_LIMIT) {
        Some(_) => {
            let mut cut: String = value.chars().take(FIELD_VALUE_LIMIT - 1).collect();
            cut.push('…');
            cut
        }
        None => value.to_string(),
    }
}

/// Builds the create-message body: one embed plus a row of green buttons.
fn message_payload(id: NotificationId, body: &MessageBody, actions: &ActionSet) -> Value {
    let fields: Vec<Value> = body
        .fields
        .iter()
        .map(|f| {
            json!({
                "name": f.label,
                "value": field_value(&f.value),
                "inline": true,
            })
        })
        .collect();

    let buttons: Vec<Value> = actions
        .iter()
        .map(|action| {
            json!({
                "type": BUTTON,
                "style": BUTTON_STYLE_SUCCESS,
                "label": action.label(),
                "custom_id": action.kind.handle(id),
            })
        })
        .collect();

    json!({
        "embeds": [{
            "title": body.title,
            "color": body.color,
            "fields": fields,
        }],
        "components": [{ "type": ACTION_ROW, "components": buttons }],
    })
}

#[async_trait]
impl NotificationSink for DiscordChannel {
    async fn deliver(
        &self,
        id: NotificationId,
        body: &MessageBody,
        actions: &ActionSet,
    ) -> Result<(), DeliveryError> {
        let token = self
            .token
            .as_deref()
            .ok_or(DeliveryError::NotConfigured("discord.token"))?;
        let channel_id = self
            .channel_id
            .as_deref()
            .ok_or(DeliveryError::NotConfigured("discord.channel_id"))?;

        let url = format!("{}/channels/{}/messages", self.api_base, channel_id);
        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bot {}", token))
            .json(&message_payload(id, body, actions))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(DeliveryError::Rejected { status, body });
        }

        tracing::debug!(channel = channel_id, notification = %id, "Posted Discord message");
        Ok(())
    }
}
