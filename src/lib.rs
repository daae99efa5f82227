//! SnooNotes client library
//!
//! A wrapper around the [SnooNotes](https://snoonotes.com/) API for reading
//! and adding moderator notes and looking up subreddit settings.
//!
//! ```no_run
//! # async fn run() -> snoonotes::Result<()> {
//! let client = snoonotes::SnooNotes::new()?;
//! client.auth("modbot", "user-key").await?;
//! let notes = client.get("rust", "modbot", "some_user").await?;
//! # Ok(())
//! # }
//! ```

pub mod cache;
mod client;
pub mod config;
pub mod data;
mod error;
pub mod transport;

#[cfg(test)]
mod test_support;

pub use client::SnooNotes;
pub use config::ClientConfig;
pub use data::{
    BotSettings, Credential, NewNote, Note, NoteType, Settings, SimpleNoteType, SubSettings,
    TokenResponse,
};
pub use error::{Result, SnooNotesError};
pub use transport::{ApiRequest, HttpResponse, ReqwestTransport, RequestBody, Transport};
