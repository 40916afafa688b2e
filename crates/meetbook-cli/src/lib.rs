//! # meetbook
//!
//! Google Calendar and Jira plumbing around [`slot_engine`]: configuration,
//! the HTTP collaborators, and console presentation for the `meetbook` CLI.
//!
//! ## Modules
//!
//! - [`config`] — `meetbook.toml` and environment overrides
//! - [`google`] — Session handle, free/busy, event insert, search, colours
//! - [`jira`] — Ticket summaries and browse links
//! - [`console`] — Slot lists, stdin selection, search and palette output

pub mod config;
pub mod console;
pub mod google;
pub mod jira;
