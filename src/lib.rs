//! Ticketsmith - LLM-assisted JIRA ticket creation

pub mod api;
pub mod config;
pub mod domain;
pub mod integrations;
pub mod prompt;
pub mod static_files;
