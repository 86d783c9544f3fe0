//! Optional features a notification backend supports

bitflags::bitflags! {
    /// Capability set discovered when a manager initializes.
    ///
    /// Anything absent is unsupported; callers should degrade gracefully.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Capabilities: u32 {
        const BODY_TEXT = 1 << 0;
        const BODY_IMAGES = 1 << 1;
        const BODY_MARKUP = 1 << 2;
        const AUDIO = 1 << 3;
        const ICON = 1 << 4;
    }
}

/// Capability strings understood from `GetCapabilities`
const FREEDESKTOP_CAPABILITIES: &[(&str, Capabilities)] = &[
    ("body", Capabilities::BODY_TEXT),
    ("body-images", Capabilities::BODY_IMAGES),
    ("body-markup", Capabilities::BODY_MARKUP),
    ("sound", Capabilities::AUDIO),
    ("icon", Capabilities::ICON),
];

impl Capabilities {
    /// Capabilities of Windows toast notifications
    pub const WINDOWS: Self = Self::BODY_TEXT
        .union(Self::BODY_IMAGES)
        .union(Self::AUDIO)
        .union(Self::ICON);

    /// Map one freedesktop capability string
    pub fn from_freedesktop_name(name: &str) -> Option<Self> {
        FREEDESKTOP_CAPABILITIES
            .iter()
            .find(|(known, _)| *known == name)
            .map(|(_, flag)| *flag)
    }

    /// Build a capability set from the strings a freedesktop server reports.
    /// Unrecognized strings are ignored.
    pub fn from_freedesktop<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        names
            .into_iter()
            .filter_map(|name| Self::from_freedesktop_name(name.as_ref()))
            .fold(Self::empty(), |acc, flag| acc | flag)
    }

    /// Human-readable names of the contained flags
    pub fn labels(&self) -> Vec<&'static str> {
        let mut labels = Vec::new();
        if self.contains(Self::BODY_TEXT) {
            labels.push("body-text");
        }
        if self.contains(Self::BODY_IMAGES) {
            labels.push("body-images");
        }
        if self.contains(Self::BODY_MARKUP) {
            labels.push("body-markup");
        }
        if self.contains(Self::AUDIO) {
            labels.push("audio");
        }
        if self.contains(Self::ICON) {
            labels.push("icon");
        }
        labels
    }
}
