// Adapters layer: concrete implementations for external systems (files, console, SMTP).

pub mod notification;
pub mod storage;
