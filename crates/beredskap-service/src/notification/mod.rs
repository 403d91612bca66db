//! Notification dispatcher: domain events in, deduplicated notifications out.

pub mod dispatcher;
pub mod formatter;

pub use dispatcher::NotificationDispatcher;
pub use formatter::NotificationFormatter;
