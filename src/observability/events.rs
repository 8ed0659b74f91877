//! Observable events for postfile

use std::fmt;

/// Observable events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Lifecycle
    BootStart,
    ConfigLoaded,
    StoreOpened,
    /// Startup could not prepare persistence
    BootFailed,
    Serving,
    ShutdownStart,
    ShutdownComplete,

    // Requests
    RequestComplete,
    RequestFailed,

    // Mutations
    PostCreated,
    PostUpdated,
    PostDeleted,

    /// A store call failed for a reason other than not-found
    StoreError,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::BootStart => "BOOT_START",
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::StoreOpened => "STORE_OPENED",
            Event::BootFailed => "BOOT_FAILED",
            Event::Serving => "SERVING",
            Event::ShutdownStart => "SHUTDOWN_START",
            Event::ShutdownComplete => "SHUTDOWN_COMPLETE",

            Event::RequestComplete => "REQUEST_COMPLETE",
            Event::RequestFailed => "REQUEST_FAILED",

            Event::PostCreated => "POST_CREATED",
            Event::PostUpdated => "POST_UPDATED",
            Event::PostDeleted => "POST_DELETED",

            Event::StoreError => "STORE_ERROR",
        }
    }

    /// Returns true if this event indicates a fatal condition
    pub fn is_fatal(&self) -> bool {
        matches!(self, Event::BootFailed)
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_events_have_string_representation() {
        let events = [
            Event::BootStart,
            Event::ConfigLoaded,
            Event::StoreOpened,
            Event::BootFailed,
            Event::Serving,
            Event::ShutdownStart,
            Event::ShutdownComplete,
            Event::RequestComplete,
            Event::RequestFailed,
            Event::PostCreated,
            Event::PostUpdated,
            Event::PostDeleted,
            Event::StoreError,
        ];

        for event in events {
            let s = event.as_str();
            assert!(!s.is_empty());
            assert!(s.chars().all(|c| c.is_uppercase() || c == '_'));
        }
    }

    #[test]
    fn test_fatal_events() {
        assert!(Event::BootFailed.is_fatal());
        assert!(!Event::StoreError.is_fatal());
        assert!(!Event::Serving.is_fatal());
    }

    #[test]
    fn test_event_display() {
        assert_eq!(format!("{}", Event::PostCreated), "POST_CREATED");
    }
}
