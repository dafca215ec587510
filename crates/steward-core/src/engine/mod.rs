//! The stateful event-processing engine.
//!
//! Owns the four state maps (points, daily activity, voice sessions, log
//! chains) and mutates them in response to platform events. Handlers run
//! one at a time off the event loop; locks are released across publish
//! awaits, so other events may be processed while a handler waits on the
//! surface. No event-handling path returns an error: failures degrade to
//! "skip the optional side effect, keep going".

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use tokio::sync::{mpsc, Mutex};
use tracing::{debug, info, warn};

use crate::activity::DailyActivity;
use crate::config::EngineConfig;
use crate::events::{MessageEvent, PlatformEvent, ReactionEvent, VoicePresenceEvent};
use crate::ledger::PointsLedger;
use crate::moderation;
use crate::routing::{LogCategory, Router, RoutingTable};
use crate::traits::NotificationSurface;
use crate::types::{ChannelId, Color, DestinationId, LogField, LogRecord, UserId};
use crate::voice::{ChainRef, VoiceTracker, VoiceTransition};

/// Render seconds the way the leave/switch records report them: `H:MM:SS`,
/// with a day prefix once a segment passes 24 hours.
fn format_duration(total_seconds: u64) -> String {
    let days = total_seconds / 86_400;
    let hours = (total_seconds % 86_400) / 3_600;
    let minutes = (total_seconds % 3_600) / 60;
    let seconds = total_seconds % 60;
    if days == 1 {
        format!("1 day, {}:{:02}:{:02}", hours, minutes, seconds)
    } else if days > 1 {
        format!("{} days, {}:{:02}:{:02}", days, hours, minutes, seconds)
    } else {
        format!("{}:{:02}:{:02}", hours, minutes, seconds)
    }
}

/// Back-reference field for a voice record, pointing at the most recent
/// record of the session's log chain.
fn chain_field(prior: ChainRef) -> Option<LogField> {
    match prior {
        ChainRef::None => None,
        ChainRef::Join(id) => Some(LogField::new("Log Link", format!("join record {}", id))),
        ChainRef::Transfer(id) => {
            Some(LogField::new("Log Link", format!("switch record {}", id)))
        }
    }
}

/// The event-processing engine.
pub struct Engine {
    config: EngineConfig,
    surface: Arc<dyn NotificationSurface>,
    router: Router,
    ledger: Mutex<PointsLedger>,
    activity: Mutex<DailyActivity>,
    voice: Mutex<VoiceTracker>,
}

impl Engine {
    /// Create an engine publishing through `surface`, with all categories
    /// initially routed to the configured primary destination.
    pub fn new(config: EngineConfig, surface: Arc<dyn NotificationSurface>) -> Self {
        let router = Router::new(
            surface.clone(),
            RoutingTable::new(config.primary_destination),
        );
        let activity = Mutex::new(DailyActivity::new(config.daily_message_threshold));
        Self {
            config,
            surface,
            router,
            ledger: Mutex::new(PointsLedger::new()),
            activity,
            voice: Mutex::new(VoiceTracker::new()),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Spawn the serial event loop over a transport-fed channel.
    ///
    /// The loop ends when the sender side is dropped.
    pub fn start(self: Arc<Self>, mut events: mpsc::Receiver<PlatformEvent>) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            info!("Event loop started");
            while let Some(event) = events.recv().await {
                debug!(event_type = event.event_type(), user = %event.user_id(), "Handling platform event");
                self.handle_event(event).await;
            }
            info!("Event loop stopped");
        })
    }

    /// Dispatch one decoded platform event.
    pub async fn handle_event(&self, event: PlatformEvent) {
        match event {
            PlatformEvent::Message(e) => self.handle_message(e).await,
            PlatformEvent::Reaction(e) => self.handle_reaction(e).await,
            PlatformEvent::VoicePresence(e) => self.handle_voice_presence(e).await,
        }
    }

    /// Publish the startup record to the general destination.
    pub async fn announce_started(&self) {
        self.router
            .publish(
                LogCategory::General,
                "Engine Started",
                "The engine has started running.",
                vec![],
            )
            .await;
    }

    // ---- inbound event handlers ----

    async fn handle_message(&self, event: MessageEvent) {
        let today = event.timestamp.date_naive();
        let tally = {
            let mut activity = self.activity.lock().await;
            activity.record_message(event.author, today)
        };

        if tally.crossed_threshold {
            let credit = self.config.daily_message_credit;
            let total = self.ledger.lock().await.adjust(event.author, credit);
            let reason = format!(
                "sending {} messages today",
                self.config.daily_message_threshold
            );
            self.confirm_points(event.channel(), event.author, credit, &reason, total)
                .await;
            self.router
                .publish(
                    LogCategory::Points,
                    "Points Awarded",
                    format!("Points awarded for {}.", reason),
                    vec![
                        LogField::new("Performed by", event.author.to_string()),
                        LogField::new("Action", format!("{} points awarded", credit)),
                    ],
                )
                .await;
        }

        let matches = moderation::scan(&event.text, &self.config.block_list);
        if !matches.is_empty() {
            // Retraction is best-effort; the penalty and the audit record
            // proceed even if the message cannot be deleted.
            if let Err(e) = self.surface.retract_message(event.message).await {
                warn!(message = %event.message, error = %e, "Failed to retract message");
            }

            let penalty = self.config.moderation_penalty;
            let total = self.ledger.lock().await.adjust(event.author, -penalty);
            self.confirm_points(
                event.channel(),
                event.author,
                -penalty,
                "using blocked language",
                total,
            )
            .await;
            self.router
                .publish(
                    LogCategory::Moderation,
                    "Blocked Language Detected",
                    "Blocked language detected and points deducted.",
                    vec![
                        LogField::new("User", event.author.to_string()),
                        LogField::new("Matched Terms", matches.join(", ")),
                        LogField::new(
                            "Action",
                            format!("{} points deducted and message retracted", penalty),
                        ),
                        LogField::new("Message Link", event.message.to_string()),
                    ],
                )
                .await;
        }
    }

    async fn handle_reaction(&self, event: ReactionEvent) {
        if event.emoji != self.config.approval_emoji {
            return;
        }
        let is_moderator = event
            .actor_roles
            .iter()
            .any(|role| self.config.moderator_roles.contains(role));
        if !is_moderator {
            return;
        }

        let credit = self.config.approval_credit;
        let total = self
            .ledger
            .lock()
            .await
            .adjust(event.target_author, credit);
        self.confirm_points(
            event.message.channel,
            event.target_author,
            credit,
            "receiving an approval reaction from a moderator",
            total,
        )
        .await;
        self.router
            .publish(
                LogCategory::Reaction,
                "Points Awarded via Reaction",
                "Points awarded for a reaction on a message.",
                vec![
                    LogField::new("Moderator", event.actor.to_string()),
                    LogField::new("Author", event.target_author.to_string()),
                    LogField::new("Action", format!("{} points awarded", credit)),
                    LogField::new("Message Link", event.message.to_string()),
                ],
            )
            .await;
    }

    async fn handle_voice_presence(&self, event: VoicePresenceEvent) {
        let user = event.user;
        match VoiceTransition::classify(event.before, event.after) {
            VoiceTransition::Stay => {
                debug!(user = %user, "Ignoring voice self-transition");
            }
            VoiceTransition::Join(channel) => {
                self.voice.lock().await.begin(user, channel, event.timestamp);
                let record_id = self
                    .router
                    .publish(
                        LogCategory::VoiceJoin,
                        "Voice Channel Join",
                        format!("{} joined voice channel {}.", user, channel),
                        vec![
                            LogField::new("User", user.to_string()),
                            LogField::new("Channel", channel.to_string()),
                            LogField::new("Action", "Joined voice channel"),
                        ],
                    )
                    .await;
                // No chain is created when the join record fails to publish;
                // duration accounting continues, only cross-referencing is lost.
                if let Some(id) = record_id {
                    self.voice.lock().await.attach_join_record(user, id);
                }
            }
            VoiceTransition::Switch(channel) => {
                let segment = self.voice.lock().await.switch(user, channel, event.timestamp);
                let Some(segment) = segment else {
                    debug!(user = %user, "Voice switch with no tracked session");
                    return;
                };

                let mut fields = vec![
                    LogField::new("User", user.to_string()),
                    LogField::new("From Channel", segment.from.to_string()),
                    LogField::new("To Channel", channel.to_string()),
                    LogField::new("Time Spent", format_duration(segment.elapsed_seconds)),
                ];
                fields.extend(chain_field(segment.prior));

                let record_id = self
                    .router
                    .publish(
                        LogCategory::VoiceSwitch,
                        "Voice Channel Switch",
                        format!("{} switched from {} to {}.", user, segment.from, channel),
                        fields,
                    )
                    .await;
                if let Some(id) = record_id {
                    self.voice
                        .lock()
                        .await
                        .record_transfer(user, id, segment.elapsed_seconds);
                }
            }
            VoiceTransition::Leave => {
                let summary = self.voice.lock().await.leave(user, event.timestamp);
                let Some(summary) = summary else {
                    debug!(user = %user, "Voice leave with no tracked session");
                    return;
                };

                let mut fields = vec![
                    LogField::new("User", user.to_string()),
                    LogField::new("Channel", summary.channel.to_string()),
                    LogField::new("Time Spent", format_duration(summary.elapsed_seconds)),
                    LogField::new(
                        "Total Time Spent",
                        format_duration(summary.total_seconds),
                    ),
                ];
                fields.extend(chain_field(summary.prior));

                // Session and chain are already gone; the record is best-effort.
                self.router
                    .publish(
                        LogCategory::VoiceLeave,
                        "Voice Channel Leave",
                        format!("{} left voice channel {}.", user, summary.channel),
                        fields,
                    )
                    .await;
            }
        }
    }

    // ---- command-layer operations ----

    /// Add points to a user. Called by the command layer after
    /// authorization; `actor` is recorded in the audit log.
    pub async fn add_points(&self, actor: UserId, user: UserId, amount: f64) -> f64 {
        let total = self.ledger.lock().await.adjust(user, amount);
        self.router
            .publish(
                LogCategory::PointsAdd,
                "Add Points Command",
                "Points added to a member.",
                vec![
                    LogField::new("Command used by", actor.to_string()),
                    LogField::new("Member affected", user.to_string()),
                    LogField::new("Action", format!("Added {} points", amount)),
                ],
            )
            .await;
        total
    }

    /// Remove points from a user.
    pub async fn remove_points(&self, actor: UserId, user: UserId, amount: f64) -> f64 {
        let total = self.ledger.lock().await.adjust(user, -amount);
        self.router
            .publish(
                LogCategory::PointsRemove,
                "Remove Points Command",
                "Points removed from a member.",
                vec![
                    LogField::new("Command used by", actor.to_string()),
                    LogField::new("Member affected", user.to_string()),
                    LogField::new("Action", format!("Removed {} points", amount)),
                ],
            )
            .await;
        total
    }

    /// Current score for a user (0 if absent).
    pub async fn query_points(&self, user: UserId) -> f64 {
        let points = self.ledger.lock().await.query(user);
        self.router
            .publish(
                LogCategory::General,
                "Points Checked",
                "Points checked for a member.",
                vec![
                    LogField::new("Member checked", user.to_string()),
                    LogField::new("Points", points.to_string()),
                ],
            )
            .await;
        points
    }

    /// Top `top_n` users by score, descending, ties by first insertion.
    pub async fn leaderboard(&self, top_n: usize) -> Vec<(UserId, f64)> {
        let rows = self.ledger.lock().await.leaderboard(top_n);
        if !rows.is_empty() {
            let fields = rows
                .iter()
                .enumerate()
                .map(|(i, (user, points))| {
                    LogField::new(format!("{}. {}", i + 1, user), format!("{} points", points))
                })
                .collect();
            self.router
                .publish(
                    LogCategory::Leaderboard,
                    "Leaderboard",
                    "Leaderboard displayed.",
                    fields,
                )
                .await;
        }
        rows
    }

    // ---- periodic sweeps ----

    /// Stamp every daily-activity entry to `{today, 0}` and publish the
    /// summary record.
    pub async fn run_daily_reset(&self, today: NaiveDate) {
        let stamped = self.activity.lock().await.reset_all(today);
        info!(stamped, "Daily activity reset");
        self.router
            .publish(
                LogCategory::General,
                "Daily Reset",
                format!("Daily message counts reset for {} users.", stamped),
                vec![],
            )
            .await;
    }

    /// Scan active voice sessions and publish an engagement notification for
    /// every session past the configured threshold.
    ///
    /// Read-only with respect to session entry times. Without the fire-once
    /// flag this re-fires every sweep cycle once past the threshold.
    pub async fn run_engagement_sweep(&self, now: DateTime<Utc>) {
        let Some(role) = self.config.engagement_role else {
            return;
        };
        let threshold_seconds = self.config.engagement_interval_minutes * 60;

        let sessions = self.voice.lock().await.sessions();
        for (user, session) in sessions {
            let elapsed = (now - session.entered_at).num_seconds();
            if elapsed < threshold_seconds as i64 {
                continue;
            }
            if self.config.engagement_fire_once && session.encouraged {
                continue;
            }
            if !self.surface.role_exists(role).await {
                debug!(role = %role, "Engagement role does not resolve; skipping sweep entry");
                continue;
            }

            let record_id = self
                .router
                .publish(
                    LogCategory::Engagement,
                    "Engagement Notification",
                    format!(
                        "Hey role {}, join voice channel {} for some fun!",
                        role, session.channel
                    ),
                    vec![
                        LogField::new("Voice Channel", session.channel.to_string()),
                        LogField::new("Role", role.to_string()),
                        LogField::new("User", user.to_string()),
                    ],
                )
                .await;
            if record_id.is_some() && self.config.engagement_fire_once {
                self.voice.lock().await.mark_encouraged(user);
            }
        }
    }

    // ---- configuration-collaborator surface ----

    /// Fully resolved routing table, one entry per category.
    pub async fn routing_table(&self) -> HashMap<LogCategory, DestinationId> {
        self.router.routing_table().await
    }

    /// Remap a category's log destination.
    pub async fn set_destination(&self, category: LogCategory, destination: DestinationId) {
        self.router.set_destination(category, destination).await;
    }

    // ---- helpers ----

    /// Send the user-facing points-change confirmation into the channel the
    /// triggering event came from. Best-effort: the confirmation does not
    /// depend on the audit record, nor the other way around.
    async fn confirm_points(
        &self,
        channel: ChannelId,
        user: UserId,
        delta: f64,
        reason: &str,
        total: f64,
    ) {
        let gained = delta > 0.0;
        let record = LogRecord::new(
            "Points Updated",
            format!(
                "{} has {} {} points for {}.",
                user,
                if gained { "gained" } else { "lost" },
                delta.abs(),
                reason
            ),
        )
        .with_field("Total Points", total.to_string())
        .with_color(if gained { Color::Green } else { Color::Red });

        if let Err(e) = self.surface.send_message(channel, record).await {
            debug!(channel = %channel, error = %e, "Failed to send points confirmation");
        }
    }

    /// Number of active voice sessions (diagnostic).
    pub async fn active_voice_sessions(&self) -> usize {
        self.voice.lock().await.active_count()
    }
}
