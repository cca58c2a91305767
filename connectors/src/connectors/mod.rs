pub mod github;
pub mod slack;
