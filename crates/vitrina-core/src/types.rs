// SPDX-FileCopyrightText: 2026 Vitrina Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain types shared across the Vitrina workspace.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Telegram user identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub i64);

/// Conversation (chat) identity. For private chats this equals the user id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChatId(pub i64);

/// Handle to a rendered chat message, used for update-in-place editing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageRef {
    pub chat: ChatId,
    pub message_id: i64,
}

/// The two listing kinds accepted by the marketplace.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[serde(rename_all = "snake_case")]
pub enum ListingKind {
    Announcement,
    CustomRequest,
}

/// Addresses exactly one listing record. Ids are unique per kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListingRef {
    pub kind: ListingKind,
    pub id: i64,
}

/// Tri-state moderation status. Transitions only pending -> approved or
/// pending -> rejected; terminal once resolved.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum ModerationStatus {
    Pending,
    Approved,
    Rejected,
}

impl ModerationStatus {
    pub fn is_pending(self) -> bool {
        self == ModerationStatus::Pending
    }
}

/// Complexity tier of an announced solution.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum Complexity {
    Low,
    Medium,
    High,
}

/// A document attached to an announcement. The file stays on the chat
/// platform's servers; we keep the reference handle and display metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentAttachment {
    pub file_id: String,
    pub file_name: String,
    pub file_size: u64,
    pub mime_type: String,
}

/// A video attached to an announcement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoAttachment {
    pub file_id: String,
    pub file_name: String,
    pub file_size: u64,
    pub mime_type: String,
    pub duration_secs: u32,
}

/// A structured AI-bot offering, the primary listing kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Announcement {
    pub id: i64,
    pub user_id: UserId,
    pub chat_id: ChatId,
    pub bot_name: String,
    pub bot_function: String,
    pub solution_description: String,
    pub included_features: String,
    pub client_requirements: String,
    pub launch_time: String,
    pub price: String,
    pub complexity: Complexity,
    pub demo_url: Option<String>,
    pub documents: Vec<DocumentAttachment>,
    pub videos: Vec<VideoAttachment>,
    pub created_at: String,
    pub status: ModerationStatus,
    pub moderator_id: Option<UserId>,
    pub rejection_comment: Option<String>,
}

impl Announcement {
    /// Projection handed to the search service: the name plus the prose the
    /// announcement is most likely matched on.
    pub fn summary(&self) -> ListingSummary {
        ListingSummary {
            id: self.id,
            name: self.bot_name.clone(),
            description: format!("{}. {}", self.bot_function, self.solution_description),
        }
    }
}

/// Creation payload for an announcement. The store assigns id, status,
/// moderator and timestamp.
#[derive(Debug, Clone, PartialEq)]
pub struct NewAnnouncement {
    pub user_id: UserId,
    pub chat_id: ChatId,
    pub bot_name: String,
    pub bot_function: String,
    pub solution_description: String,
    pub included_features: String,
    pub client_requirements: String,
    pub launch_time: String,
    pub price: String,
    pub complexity: Complexity,
    pub demo_url: Option<String>,
    pub documents: Vec<DocumentAttachment>,
    pub videos: Vec<VideoAttachment>,
}

/// Budget sentinel stored when the requester declines to name a figure.
pub const BUDGET_UNDEFINED: &str = "undefined";

/// A free-form request for an individually built solution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomRequest {
    pub id: i64,
    pub user_id: UserId,
    pub chat_id: ChatId,
    pub business_description: String,
    pub automation_task: String,
    pub budget: String,
    pub created_at: String,
    pub status: ModerationStatus,
    pub moderator_id: Option<UserId>,
    pub rejection_comment: Option<String>,
}

/// Creation payload for a custom request.
#[derive(Debug, Clone, PartialEq)]
pub struct NewCustomRequest {
    pub user_id: UserId,
    pub chat_id: ChatId,
    pub business_description: String,
    pub automation_task: String,
    pub budget: String,
}

/// Tagged union over the two listing kinds.
#[derive(Debug, Clone, PartialEq)]
pub enum Listing {
    Announcement(Announcement),
    CustomRequest(CustomRequest),
}

impl Listing {
    pub fn kind(&self) -> ListingKind {
        match self {
            Listing::Announcement(_) => ListingKind::Announcement,
            Listing::CustomRequest(_) => ListingKind::CustomRequest,
        }
    }

    pub fn id(&self) -> i64 {
        match self {
            Listing::Announcement(a) => a.id,
            Listing::CustomRequest(r) => r.id,
        }
    }

    pub fn listing_ref(&self) -> ListingRef {
        ListingRef {
            kind: self.kind(),
            id: self.id(),
        }
    }

    /// Conversation of the submitting user, the target for outcome notifications.
    pub fn chat_id(&self) -> ChatId {
        match self {
            Listing::Announcement(a) => a.chat_id,
            Listing::CustomRequest(r) => r.chat_id,
        }
    }

    pub fn user_id(&self) -> UserId {
        match self {
            Listing::Announcement(a) => a.user_id,
            Listing::CustomRequest(r) => r.user_id,
        }
    }

    pub fn status(&self) -> ModerationStatus {
        match self {
            Listing::Announcement(a) => a.status,
            Listing::CustomRequest(r) => r.status,
        }
    }

    pub fn moderator_id(&self) -> Option<UserId> {
        match self {
            Listing::Announcement(a) => a.moderator_id,
            Listing::CustomRequest(r) => r.moderator_id,
        }
    }

    pub fn rejection_comment(&self) -> Option<&str> {
        match self {
            Listing::Announcement(a) => a.rejection_comment.as_deref(),
            Listing::CustomRequest(r) => r.rejection_comment.as_deref(),
        }
    }

    /// Short human-readable title used in notifications.
    pub fn title(&self) -> &str {
        match self {
            Listing::Announcement(a) => &a.bot_name,
            Listing::CustomRequest(r) => &r.business_description,
        }
    }
}

/// The moderation decision applied to a pending listing.
#[derive(Debug, Clone, PartialEq)]
pub enum Decision {
    Approve,
    Reject { comment: String },
}

/// Result of the store's single mutation point.
///
/// `AlreadyProcessed` is the race sentinel: the listing exists but was
/// resolved before this call took the row lock. It is distinct from success
/// and never corrupts state.
#[derive(Debug, Clone, PartialEq)]
pub enum ResolveOutcome {
    Resolved(Listing),
    AlreadyProcessed,
    NotFound,
}

/// Per-recipient result of a best-effort broadcast.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeliveryReport {
    pub succeeded: Vec<ChatId>,
    pub failed: Vec<ChatId>,
}

impl DeliveryReport {
    /// True when every recipient received the message.
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

// --- Keyboard model (channel-agnostic inline keyboards) ---

/// One tappable button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Button {
    pub label: String,
    pub action: ButtonAction,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ButtonAction {
    /// Emits the payload back through the transport as a callback event.
    Callback(String),
    /// Opens an external URL.
    Url(String),
}

impl Button {
    pub fn callback(label: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            action: ButtonAction::Callback(data.into()),
        }
    }

    pub fn url(label: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            action: ButtonAction::Url(url.into()),
        }
    }
}

/// Rows of buttons rendered under a message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Keyboard {
    pub rows: Vec<Vec<Button>>,
}

impl Keyboard {
    pub fn new(rows: Vec<Vec<Button>>) -> Self {
        Self { rows }
    }

    /// Single-button keyboard, the most common shape.
    pub fn single(button: Button) -> Self {
        Self {
            rows: vec![vec![button]],
        }
    }
}

// --- Search types ---

/// The candidate projection handed to the search service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListingSummary {
    pub id: i64,
    pub name: String,
    pub description: String,
}

/// One ranked result.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchHit {
    pub summary: ListingSummary,
    /// Relevance on a 1-10 scale; the fallback path reports 0.
    pub relevance_score: u8,
    pub explanation: String,
}

/// Outcome of a ranked search over the approved listings.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchOutcome {
    pub found: bool,
    pub results: Vec<SearchHit>,
    pub explanation: String,
}
