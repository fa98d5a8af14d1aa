//! Welfare check orchestration: compose the alarm, generate it, dispatch
//! it to every contact, and record what happened.
//!
//! Dispatch is unconditional when a check is invoked. The most recent
//! heartbeat only shapes the wording of the generated report; whether a
//! check runs at all is up to the external trigger (cron, dashboard
//! button, CLI).

use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Local;
use serde::Serialize;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::config::{Config, DeliveryMethod, EmergencyContact};
use crate::heartbeat::{HeartbeatEntry, describe_last, now_ms};
use crate::logbook::RingLog;
use crate::provider::{AlertChannel, DeliveryStatus, TextGenerator};
use crate::utils::preview;

/// Alert-log content previews are capped at this many characters.
const CONTENT_PREVIEW_CHARS: usize = 200;

/// Derived system state shown on the dashboard header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SystemStatus {
    Active,
    Warning,
    AlertTriggered,
    Disabled,
}

/// One recorded delivery attempt.
#[derive(Debug, Clone, Serialize)]
pub struct AlertRecord {
    pub id: String,
    /// Dispatch timestamp in milliseconds.
    pub ts: u64,
    pub recipient: String,
    pub status: DeliveryStatus,
    /// Preview of the delivered content.
    pub content: String,
}

/// In-process session history of alert dispatches, newest first.
pub type AlertLedger = RingLog<AlertRecord>;

/// What a completed check hands back to the caller.
#[derive(Debug, Clone, Serialize)]
pub struct CheckOutcome {
    pub report: String,
    pub deliveries: Vec<AlertRecord>,
}

pub struct WelfareCheck {
    config: Config,
    generator: Arc<dyn TextGenerator>,
    channels: Vec<Arc<dyn AlertChannel>>,
}

impl WelfareCheck {
    pub fn new(
        config: Config,
        generator: Arc<dyn TextGenerator>,
        channels: Vec<Arc<dyn AlertChannel>>,
    ) -> Self {
        Self {
            config,
            generator,
            channels,
        }
    }

    /// Build the alarm prompt from the settings and the last heartbeat.
    fn alarm_prompt(&self, last_seen: &str, now_str: &str) -> String {
        format!(
            "You are a professional safety monitoring system performing the daily \
             welfare check at {now}. The monitored user is \"{user}\". Last observed \
             activity: {last_seen}. If there was no recent heartbeat, write a concise, \
             urgent but calm alarm message for their emergency contact; otherwise write \
             a short status update. Preferred wording from the operator: \"{template}\". \
             Mention that this is an automated welfare monitoring system. \
             Write the message in {language}.",
            now = now_str,
            user = self.config.user_name,
            last_seen = last_seen,
            template = self.config.alert.message_template,
            language = self.config.alert.language,
        )
    }

    /// Prompt for the short check-in acknowledgment (heartbeat `notify`).
    fn ack_prompt(&self, entry: &HeartbeatEntry, now_str: &str) -> String {
        format!(
            "You are an automated welfare monitoring system. \"{user}\" just checked \
             in via {source} at {now}. Write a one-sentence confirmation for their \
             emergency contact that all is well. Write it in {language}.",
            user = self.config.user_name,
            source = entry.source,
            now = now_str,
            language = self.config.alert.language,
        )
    }

    /// Run one full check: generate the alarm and dispatch it to every
    /// configured contact. Generator failure aborts the check; a failed
    /// delivery only marks that contact and moves on.
    pub async fn run(
        &self,
        last: Option<&HeartbeatEntry>,
        alerts: &AlertLedger,
    ) -> Result<CheckOutcome> {
        let now_str = Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
        let last_seen = describe_last(last, now_ms());
        info!(%last_seen, "welfare check: generating alarm report");

        let report = self
            .generator
            .generate(&self.alarm_prompt(&last_seen, &now_str))
            .await
            .context("alarm generation failed")?;

        let subject = format!("GuardianSwitch alert for {}", self.config.user_name);
        let deliveries = self.dispatch_all(&subject, &report, alerts).await;
        Ok(CheckOutcome { report, deliveries })
    }

    /// The `notify` heartbeat path: generate a short confirmation and
    /// deliver it to the contacts.
    pub async fn acknowledge(
        &self,
        entry: &HeartbeatEntry,
        alerts: &AlertLedger,
    ) -> Result<CheckOutcome> {
        let now_str = Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
        let report = self
            .generator
            .generate(&self.ack_prompt(entry, &now_str))
            .await
            .context("acknowledgment generation failed")?;

        let subject = format!("GuardianSwitch check-in: {}", self.config.user_name);
        let deliveries = self.dispatch_all(&subject, &report, alerts).await;
        Ok(CheckOutcome { report, deliveries })
    }

    async fn dispatch_all(
        &self,
        subject: &str,
        body: &str,
        alerts: &AlertLedger,
    ) -> Vec<AlertRecord> {
        let mut records = Vec::with_capacity(self.config.contacts.len());
        for contact in &self.config.contacts {
            let record = self.dispatch(contact, subject, body).await;
            alerts.push(record.clone());
            records.push(record);
        }
        info!(
            sent = records
                .iter()
                .filter(|r| r.status == DeliveryStatus::Sent)
                .count(),
            total = records.len(),
            "alert dispatch round complete"
        );
        records
    }

    async fn dispatch(&self, contact: &EmergencyContact, subject: &str, body: &str) -> AlertRecord {
        let status = match self.channel_for(contact.method) {
            None => {
                warn!(
                    contact = %contact.name,
                    method = contact.method.as_str(),
                    "no delivery channel for contact; skipping"
                );
                DeliveryStatus::Skipped
            }
            Some(channel) => match channel.deliver(contact, subject, body).await {
                Ok(()) => {
                    info!(contact = %contact.name, channel = channel.name(), "alert delivered");
                    DeliveryStatus::Sent
                }
                Err(e) => {
                    error!(contact = %contact.name, channel = channel.name(), "delivery failed: {e}");
                    DeliveryStatus::Failed
                }
            },
        };
        AlertRecord {
            id: Uuid::new_v4().to_string(),
            ts: now_ms(),
            recipient: contact.name.clone(),
            status,
            content: preview(body, CONTENT_PREVIEW_CHARS),
        }
    }

    fn channel_for(&self, method: DeliveryMethod) -> Option<&Arc<dyn AlertChannel>> {
        self.channels.iter().find(|c| c.supports(method))
    }
}

/// Derive the dashboard status from the alarm switch and recent activity.
pub fn derive_status(
    alarm_enabled: bool,
    last_heartbeat: Option<&HeartbeatEntry>,
    last_alert: Option<&AlertRecord>,
    stale_window: std::time::Duration,
    now: u64,
) -> SystemStatus {
    if !alarm_enabled {
        return SystemStatus::Disabled;
    }

    // A sent alarm newer than the last heartbeat keeps the banner red
    // until the next check-in clears it.
    let alarm_pending = last_alert
        .filter(|alert| alert.status == DeliveryStatus::Sent)
        .map(|alert| last_heartbeat.is_none_or(|hb| alert.ts > hb.ts))
        .unwrap_or(false);
    if alarm_pending {
        return SystemStatus::AlertTriggered;
    }

    match last_heartbeat {
        Some(hb) if hb.age_secs(now) <= stale_window.as_secs() => SystemStatus::Active,
        _ => SystemStatus::Warning,
    }
}
