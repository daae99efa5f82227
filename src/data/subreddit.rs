//! Subreddit settings and note types
//!
//! Settings change rarely, so they are served from the client's
//! [`ConfigCache`](crate::cache::ConfigCache) until the TTL runs out.

use reqwest::Method;
use std::collections::HashMap;
use tracing::{debug, warn};

use super::{NoteType, SimpleNoteType, SubSettings};
use crate::client::SnooNotes;
use crate::error::{Result, SnooNotesError};
use crate::transport::RequestBody;

const SUBREDDIT_PATH: &str = "restapi/Subreddit";

/// Reddit only allows ASCII letters, digits and underscores in subreddit names.
fn validate_sub(sub: &str) -> Result<()> {
    if sub.is_empty() {
        return Err(SnooNotesError::InvalidInput(
            "can only fetch config for one subreddit at a time".to_string(),
        ));
    }
    if !sub.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(SnooNotesError::InvalidInput(format!(
            "invalid subreddit name {sub:?}"
        )));
    }
    Ok(())
}

impl SnooNotes {
    /// Returns the settings of `sub`, acting as `as_user`
    ///
    /// Cached per subreddit for the configured TTL (24 hours by default).
    ///
    /// # Errors
    /// * `InvalidInput` if `sub` is empty or not a subreddit name
    /// * `NotFound` if the service has no settings for `sub`
    pub async fn get_config(&self, as_user: &str, sub: &str) -> Result<SubSettings> {
        validate_sub(sub)?;

        if let Some(cached) = self.configs.get(sub) {
            debug!(action = "GetConfig", username = as_user, sub, "got cached config");
            return Ok(cached);
        }

        let path = format!("{SUBREDDIT_PATH}/{sub}");
        let request = self
            .authed_request("GetConfig", as_user, Method::GET, &path, RequestBody::Empty)
            .await?;
        let response = self.send(request).await?;
        let all: Vec<SubSettings> = response.json("GetConfig")?;

        let Some(settings) = all.into_iter().find(|s| s.sub_name.eq_ignore_ascii_case(sub)) else {
            warn!(action = "GetConfig", username = as_user, sub, "no config found");
            return Err(SnooNotesError::NotFound {
                what: format!("config for subreddit {sub}"),
            });
        };

        debug!(action = "GetConfig", username = as_user, sub, "got config");
        self.configs.put(sub, settings.clone());
        Ok(settings)
    }

    /// Returns the note types defined by `sub`
    pub async fn get_note_types(&self, as_user: &str, sub: &str) -> Result<Vec<NoteType>> {
        let settings = self.get_config(as_user, sub).await.inspect_err(|e| {
            warn!(action = "GetNoteTypes", username = as_user, sub, error = %e, "couldn't get sub config");
        })?;

        let note_types: Vec<NoteType> = settings
            .settings
            .note_types
            .into_iter()
            .filter(|nt| nt.sub_name.eq_ignore_ascii_case(sub))
            .collect();

        debug!(action = "GetNoteTypes", username = as_user, sub, "found {} note types", note_types.len());
        Ok(note_types)
    }

    /// Note type ids mapped to their display name and color
    ///
    /// Convenient for rendering notes; use [`get_note_types`](Self::get_note_types)
    /// for the full definitions.
    pub async fn get_note_type_map(
        &self,
        as_user: &str,
        sub: &str,
    ) -> Result<HashMap<i32, SimpleNoteType>> {
        let note_types = self.get_note_types(as_user, sub).await?;

        let map: HashMap<i32, SimpleNoteType> = note_types
            .iter()
            .map(|nt| (nt.note_type_id, SimpleNoteType::from(nt)))
            .collect();

        debug!(action = "GetNoteTypeMap", username = as_user, sub, "found {} note types", map.len());
        Ok(map)
    }
}
