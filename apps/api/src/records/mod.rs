//! The user's own notes, court contacts, and court details.
//! Every query is scoped by `user_id`; another user's row reads as not found.

pub mod contacts;
pub mod court_info;
pub mod handlers;
pub mod notes;
