use serde::{Deserialize, Serialize};

/// An independently leveled audio channel.
///
/// `Media` is the primary stream controlled by the hardware keys and the
/// primary panel slider; the remaining streams live on the secondary panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stream {
    Media,
    Ring,
    Notification,
    Alarm,
}

impl Stream {
    /// Streams shown on the secondary panel, in right-to-left visual order.
    pub const SECONDARY: [Stream; 3] = [Stream::Ring, Stream::Notification, Stream::Alarm];

    /// Whether raising this stream may require leaving a silent/DND
    /// policy mode first.
    pub fn policy_sensitive(self) -> bool {
        matches!(self, Stream::Ring | Stream::Notification)
    }

    pub fn label(self) -> &'static str {
        match self {
            Stream::Media => "media",
            Stream::Ring => "ring",
            Stream::Notification => "notification",
            Stream::Alarm => "alarm",
        }
    }
}

impl std::fmt::Display for Stream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}
