//! Glossary, legal library, rights & duties, and local resources.

pub mod filters;
pub mod handlers;
pub mod store;
