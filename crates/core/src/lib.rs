//! Inkpad Core Library
//!
//! Models, storage, credentials, and the OTP-gated account workflows for
//! the Inkpad notepad service.

pub mod account;
pub mod credentials;
pub mod error;
pub mod invariants;
pub mod models;
pub mod notes;
pub mod otp;
pub mod session;
pub mod store;
pub mod uploads;

pub use error::{Error, Result};
pub use models::*;
pub use notes::NoteService;
pub use otp::{Challenge, Purpose};
pub use session::{login, logout, Session};
pub use store::{Collection, NoteRepository, NoteStore, Storage, Store, UserRepository, UserStore};
pub use uploads::UploadStore;
