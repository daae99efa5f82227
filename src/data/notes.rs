//! Reading and writing notes

use reqwest::Method;
use serde_json::json;
use std::collections::HashMap;
use tracing::debug;

use super::{NewNote, Note};
use crate::client::SnooNotes;
use crate::error::{Result, SnooNotesError};
use crate::transport::RequestBody;

const ADD_NOTE_PATH: &str = "api/note";
const GET_NOTES_PATH: &str = "api/Note/GetNotes";

/// Response from `api/Note/GetNotes`: username to that user's notes
type GetNotesResponse = HashMap<String, Vec<Note>>;

impl SnooNotes {
    /// Adds a new note, acting as `as_user`
    ///
    /// The service answers with an empty body, so success is judged by the
    /// status code alone.
    pub async fn add(&self, as_user: &str, note: &NewNote) -> Result<()> {
        let body = serde_json::to_value(note).map_err(|e| SnooNotesError::encode("Add", e))?;
        let request = self
            .authed_request("Add", as_user, Method::POST, ADD_NOTE_PATH, RequestBody::Json(body))
            .await?;

        self.send(request).await?;

        debug!(action = "Add", username = as_user, about = %note.applies_to_username, "added note");
        Ok(())
    }

    /// Returns the notes about `about` visible to `as_user`
    ///
    /// With a non-empty `sub` only notes whose subreddit is exactly `sub`
    /// are kept; an empty `sub` keeps notes from every subreddit. Returns
    /// `None` when the service has no notes about the user at all.
    pub async fn get(&self, sub: &str, as_user: &str, about: &str) -> Result<Option<Vec<Note>>> {
        let request = self
            .authed_request(
                "GetNotes",
                as_user,
                Method::POST,
                GET_NOTES_PATH,
                RequestBody::Json(json!([about])),
            )
            .await?;

        let response = self.send(request).await?;
        let notes: GetNotesResponse = response.json("GetNotes")?;

        let Some(found) = find_user_notes(notes, about) else {
            debug!(action = "Get", username = as_user, about, "no notes found");
            return Ok(None);
        };

        let total = found.len();
        let filtered = filter_by_sub(found, sub);
        debug!(
            action = "Get",
            username = as_user,
            about,
            "got {} (of {}) notes",
            filtered.len(),
            total
        );

        Ok(Some(filtered))
    }
}

/// Usernames are matched case-insensitively, as reddit treats them.
fn find_user_notes(notes: GetNotesResponse, about: &str) -> Option<Vec<Note>> {
    notes
        .into_iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(about))
        .map(|(_, notes)| notes)
}

/// Subreddit names must match exactly here.
fn filter_by_sub(mut notes: Vec<Note>, sub: &str) -> Vec<Note> {
    if !sub.is_empty() {
        notes.retain(|note| note.sub_name == sub);
    }
    notes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{authed_client, MockTransport};
    use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};

    const NOTES_JSON: &str = r#"{
        "SomeUser": [
            {"NoteID": 1, "NoteTypeID": 10, "SubName": "rust", "Submitter": "mod_a",
             "Message": "spam", "Url": "https://reddit.com/1", "TimeStamp": "2024-07-01T00:00:00",
             "ParentSubreddit": null},
            {"NoteID": 2, "NoteTypeID": 11, "SubName": "golang", "Submitter": "mod_b",
             "Message": "ban", "Url": "https://reddit.com/2", "TimeStamp": "2024-07-02T00:00:00",
             "ParentSubreddit": null},
            {"NoteID": 3, "NoteTypeID": 10, "SubName": "Rust", "Submitter": "mod_c",
             "Message": "warned", "Url": "https://reddit.com/3", "TimeStamp": "2024-07-03T00:00:00",
             "ParentSubreddit": "rust"}
        ]
    }"#;

    fn new_note() -> NewNote {
        NewNote {
            note_type_id: 10,
            sub_name: "rust".to_string(),
            message: "spamming links".to_string(),
            applies_to_username: "someuser".to_string(),
            url: "https://reddit.com/r/rust/comments/1".to_string(),
        }
    }

    #[tokio::test]
    async fn test_get_filters_by_exact_subreddit() {
        let transport = MockTransport::new();
        transport.respond(GET_NOTES_PATH, 200, NOTES_JSON);
        let client = authed_client(&transport, "modbot").await;

        let notes = client.get("rust", "modbot", "someuser").await.unwrap().expect("notes");

        let ids: Vec<i64> = notes.iter().map(|n| n.note_id).collect();
        assert_eq!(ids, vec![1]);
    }

    #[tokio::test]
    async fn test_get_with_empty_sub_returns_everything() {
        let transport = MockTransport::new();
        transport.respond(GET_NOTES_PATH, 200, NOTES_JSON);
        let client = authed_client(&transport, "modbot").await;

        let notes = client.get("", "modbot", "SOMEUSER").await.unwrap().expect("notes");

        assert_eq!(notes.len(), 3);
    }

    #[tokio::test]
    async fn test_get_unknown_target_returns_none() {
        let transport = MockTransport::new();
        transport.respond(GET_NOTES_PATH, 200, "{}");
        let client = authed_client(&transport, "modbot").await;

        let notes = client.get("rust", "modbot", "someuser").await.unwrap();

        assert!(notes.is_none());
    }

    #[tokio::test]
    async fn test_get_sends_authed_json_array() {
        let transport = MockTransport::new();
        transport.respond(GET_NOTES_PATH, 200, "{}");
        let client = authed_client(&transport, "modbot").await;

        client.get("rust", "modbot", "some\"user").await.unwrap();

        let sent = transport.requests().pop().expect("request sent");
        assert_eq!(sent.url, "https://snoonotes.test/api/Note/GetNotes");
        assert_eq!(sent.headers[AUTHORIZATION], "Bearer tok");
        assert_eq!(sent.headers[CONTENT_TYPE], "application/json");
        assert_eq!(sent.body, RequestBody::Json(json!(["some\"user"])));
    }

    #[tokio::test]
    async fn test_get_malformed_body_is_decode_error() {
        let transport = MockTransport::new();
        transport.respond(GET_NOTES_PATH, 200, "[1, 2");
        let client = authed_client(&transport, "modbot").await;

        let err = client.get("rust", "modbot", "someuser").await.unwrap_err();

        assert!(matches!(err, SnooNotesError::Decode { operation: "GetNotes", .. }));
    }

    #[tokio::test]
    async fn test_get_server_error_is_transport_error() {
        let transport = MockTransport::new();
        transport.respond(GET_NOTES_PATH, 503, "");
        let client = authed_client(&transport, "modbot").await;

        let err = client.get("rust", "modbot", "someuser").await.unwrap_err();

        assert_eq!(err.http_status(), Some(503));
        assert!(matches!(err, SnooNotesError::Transport { operation: "GetNotes", .. }));
    }

    #[tokio::test]
    async fn test_get_as_unknown_user_sends_nothing() {
        let transport = MockTransport::new();
        let client = crate::test_support::mock_client(&transport);

        let err = client.get("rust", "stranger", "someuser").await.unwrap_err();

        assert!(matches!(err, SnooNotesError::NoSuchUser { .. }));
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn test_add_posts_note() {
        let transport = MockTransport::new();
        transport.respond(ADD_NOTE_PATH, 200, "");
        let client = authed_client(&transport, "modbot").await;

        client.add("modbot", &new_note()).await.expect("add should succeed");

        let sent = transport.requests().pop().expect("request sent");
        assert_eq!(sent.method, Method::POST);
        assert_eq!(sent.url, "https://snoonotes.test/api/note");
        let RequestBody::Json(body) = sent.body else {
            panic!("note should be sent as JSON");
        };
        assert_eq!(body["AppliesToUsername"], "someuser");
        assert_eq!(body["NoteTypeID"], 10);
    }

    #[tokio::test]
    async fn test_add_server_error_is_transport_error() {
        let transport = MockTransport::new();
        transport.respond(ADD_NOTE_PATH, 500, "");
        let client = authed_client(&transport, "modbot").await;

        let err = client.add("modbot", &new_note()).await.unwrap_err();

        assert_eq!(err.http_status(), Some(500));
    }

    #[tokio::test]
    async fn test_add_network_failure_is_transport_error() {
        let transport = MockTransport::new();
        transport.fail(ADD_NOTE_PATH, "connection reset");
        let client = authed_client(&transport, "modbot").await;

        let err = client.add("modbot", &new_note()).await.unwrap_err();

        assert!(matches!(err, SnooNotesError::Transport { operation: "Add", status: None, .. }));
    }

    #[test]
    fn test_filter_by_sub_is_case_sensitive() {
        let notes: GetNotesResponse = serde_json::from_str(NOTES_JSON).unwrap();
        let notes = find_user_notes(notes, "someuser").unwrap();

        let kept = filter_by_sub(notes, "Rust");

        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].note_id, 3);
    }
}
