pub mod handlers;
pub mod masking;
pub mod profiles;
