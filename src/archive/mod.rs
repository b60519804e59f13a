pub mod client;
pub mod thread;

pub use client::ArchiveClient;
pub use thread::{collect_email_ids, extract_thread_id};
