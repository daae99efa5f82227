//! Data models for the SnooNotes API
//!
//! Field names on the wire are fixed by the service and matched exactly,
//! so every field carries an explicit serde rename.

pub mod auth;
pub mod notes;
pub mod subreddit;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Response from `auth/connect/token`
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    /// Lifetime of the token in seconds
    pub expires_in: u64,
    pub token_type: String,
}

/// A cached OAuth2 token together with the key that produced it
///
/// The key is kept so an expired token can be replaced without asking the
/// caller again.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    pub access_token: String,
    pub token_type: String,
    pub expires_at: DateTime<Utc>,
    pub key: String,
}

impl Credential {
    /// Builds a credential from a token response received at `now`
    pub fn from_response(response: TokenResponse, key: impl Into<String>, now: DateTime<Utc>) -> Self {
        // Clamped so absurd lifetimes cannot overflow the timestamp.
        let lifetime = response.expires_in.min(i32::MAX as u64) as i64;
        let expires_at = now
            .checked_add_signed(Duration::seconds(lifetime))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);

        Self {
            access_token: response.access_token,
            token_type: response.token_type,
            expires_at,
            key: key.into(),
        }
    }

    /// True once `now` is strictly past the expiry instant
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }

    /// Value for the `Authorization` header
    pub fn authorization(&self) -> String {
        format!("{} {}", self.token_type, self.access_token)
    }
}

// Keep tokens and keys out of logs.
impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("access_token", &"<redacted>")
            .field("token_type", &self.token_type)
            .field("expires_at", &self.expires_at)
            .field("key", &"<redacted>")
            .finish()
    }
}

/// Deserializes a JSON `null` as the type's default value
///
/// The service sends `null` for unset strings; combined with
/// `#[serde(default)]` a missing field is accepted too.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A note returned from SnooNotes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    /// Service-assigned note id
    #[serde(rename = "NoteID", alias = "NoteId")]
    pub note_id: i64,
    /// Id of the subreddit's [`NoteType`] this note is filed under
    #[serde(rename = "NoteTypeID", alias = "NoteTypeId")]
    pub note_type_id: i32,
    /// Subreddit the note belongs to, as the service spells it
    #[serde(rename = "SubName", default, deserialize_with = "null_as_default")]
    pub sub_name: String,
    /// Moderator who wrote the note
    #[serde(rename = "Submitter", default, deserialize_with = "null_as_default")]
    pub submitter: String,
    /// Note text
    #[serde(rename = "Message", default, deserialize_with = "null_as_default")]
    pub message: String,
    /// Link to the post or comment the note is about, empty if none
    #[serde(rename = "Url", default, deserialize_with = "null_as_default")]
    pub url: String,
    /// When the note was written, as sent by the service
    #[serde(rename = "TimeStamp", default, deserialize_with = "null_as_default")]
    pub timestamp: String,
    /// Set when the note was shared from another subreddit
    #[serde(rename = "ParentSubreddit", default)]
    pub parent_subreddit: Option<String>,
}

/// A note to submit to SnooNotes via `api/note`
///
/// Differs from [`Note`]: the service assigns the id, submitter and timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewNote {
    /// Id of the [`NoteType`] to file the note under
    #[serde(rename = "NoteTypeID")]
    pub note_type_id: i32,
    /// Subreddit the note belongs to
    #[serde(rename = "SubName")]
    pub sub_name: String,
    /// Note text
    #[serde(rename = "Message")]
    pub message: String,
    /// Reddit user the note is about
    #[serde(rename = "AppliesToUsername")]
    pub applies_to_username: String,
    /// Link to the offending post or comment
    #[serde(rename = "url")]
    pub url: String,
}

/// Settings for one subreddit, from `restapi/Subreddit/{name}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubSettings {
    #[serde(rename = "SubredditID", alias = "SubredditId")]
    pub subreddit_id: i64,
    #[serde(rename = "SubName", default, deserialize_with = "null_as_default")]
    pub sub_name: String,
    /// Whether SnooNotes is enabled for the subreddit
    #[serde(rename = "Active")]
    pub active: bool,
    #[serde(rename = "BotSettings", default)]
    pub bot_settings: Option<BotSettings>,
    #[serde(rename = "Settings")]
    pub settings: Settings,
}


impl SubSettings {
    pub fn access_mask(&self) -> i64 {
        self.settings.access_mask
    }

    pub fn note_types(&self) -> &[NoteType] {
        &self.settings.note_types
    }

    pub fn perm_ban_id(&self) -> Option<i32> {
        self.settings.perm_ban_id
    }

    pub fn temp_ban_id(&self) -> Option<i32> {
        self.settings.temp_ban_id
    }
}

/// Dirtbag integration settings of a subreddit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BotSettings {
    /// Dirtbag instance the subreddit reports to, empty if unset
    #[serde(rename = "DirtbagUrl", default, deserialize_with = "null_as_default")]
    pub dirtbag_url: String,
    /// Account SnooNotes uses to talk to Dirtbag, empty if unset
    #[serde(rename = "DirtbagUsername", default, deserialize_with = "null_as_default")]
    pub dirtbag_username: String,
}

/// The note-related part of a subreddit's settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(rename = "AccessMask")]
    pub access_mask: i64,
    #[serde(rename = "NoteTypes", default)]
    pub note_types: Vec<NoteType>,
    /// Note type applied automatically on permanent bans
    #[serde(rename = "PermBanID", alias = "PermBanId", default)]
    pub perm_ban_id: Option<i32>,
    /// Note type applied automatically on temporary bans
    #[serde(rename = "TempBanID", alias = "TempBanId", default)]
    pub temp_ban_id: Option<i32>,
}

/// A type of note defined by a subreddit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoteType {
    /// Id referenced by [`Note::note_type_id`]
    #[serde(rename = "NoteTypeID", alias = "NoteTypeId")]
    pub note_type_id: i32,
    /// Subreddit that defines this type
    #[serde(rename = "SubName", default, deserialize_with = "null_as_default")]
    pub sub_name: String,
    /// Label shown next to notes of this type
    #[serde(rename = "DisplayName", default, deserialize_with = "null_as_default")]
    pub display_name: String,
    /// Hex color without the leading `#`
    #[serde(rename = "ColorCode", default, deserialize_with = "null_as_default")]
    pub color_code: String,
    /// Position in the subreddit's list of types
    #[serde(rename = "DisplayOrder")]
    pub display_order: i32,
    /// Render the label in bold
    #[serde(rename = "Bold")]
    pub bold: bool,
    /// Render the label in italics
    #[serde(rename = "Italic")]
    pub italic: bool,
}

/// Just what an application needs to render a note type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimpleNoteType {
    /// Label shown next to notes of this type
    pub display_name: String,
    /// Hex color without the leading `#`
    pub color_code: String,
}

impl From<&NoteType> for SimpleNoteType {
    fn from(note_type: &NoteType) -> Self {
        Self {
            display_name: note_type.display_name.clone(),
            color_code: note_type.color_code.clone(),
        }
    }
}
