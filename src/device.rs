//! Device class detection
//!
//! The scene layout and jump impulse differ between a desktop browser and a
//! phone held upright. Detection mirrors what the browser exposes: user agent,
//! inner window size and touch support.

use serde::{Deserialize, Serialize};

/// User agent fragments that identify a handheld device
const MOBILE_AGENTS: [&str; 4] = ["iphone", "ipad", "ipod", "android"];

/// Widest viewport treated as mobile when touch is available
const MOBILE_MAX_WIDTH: f64 = 768.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DeviceClass {
    #[default]
    Desktop,
    MobilePortrait,
}

impl DeviceClass {
    /// Classify the current viewport.
    ///
    /// A device is mobile if its user agent names a handheld, or if it has a
    /// narrow touch viewport. It is only `MobilePortrait` when it is also taller
    /// than it is wide; mobile landscape plays with the desktop layout.
    pub fn detect(user_agent: &str, inner_width: f64, inner_height: f64, has_touch: bool) -> Self {
        let agent = user_agent.to_lowercase();
        let is_mobile = MOBILE_AGENTS.iter().any(|m| agent.contains(m))
            || (inner_width <= MOBILE_MAX_WIDTH && has_touch);
        let is_portrait = inner_height > inner_width;

        if is_mobile && is_portrait {
            DeviceClass::MobilePortrait
        } else {
            DeviceClass::Desktop
        }
    }

    pub fn is_mobile_portrait(self) -> bool {
        self == DeviceClass::MobilePortrait
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceClass::Desktop => "desktop",
            DeviceClass::MobilePortrait => "mobile-portrait",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DESKTOP_UA: &str =
        "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0";
    const IPHONE_UA: &str = "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X)";

    #[test]
    fn test_desktop_browser() {
        assert_eq!(
            DeviceClass::detect(DESKTOP_UA, 1920.0, 1080.0, false),
            DeviceClass::Desktop
        );
    }

    #[test]
    fn test_phone_portrait_and_landscape() {
        assert_eq!(
            DeviceClass::detect(IPHONE_UA, 390.0, 844.0, true),
            DeviceClass::MobilePortrait
        );
        // Rotated phone uses the desktop layout
        assert_eq!(
            DeviceClass::detect(IPHONE_UA, 844.0, 390.0, true),
            DeviceClass::Desktop
        );
    }

    #[test]
    fn test_narrow_touch_viewport_without_mobile_agent() {
        assert_eq!(
            DeviceClass::detect(DESKTOP_UA, 600.0, 900.0, true),
            DeviceClass::MobilePortrait
        );
        // Narrow but no touch: still desktop
        assert_eq!(
            DeviceClass::detect(DESKTOP_UA, 600.0, 900.0, false),
            DeviceClass::Desktop
        );
    }

    #[test]
    fn test_agent_match_is_case_insensitive() {
        assert!(DeviceClass::detect("some ANDROID build", 400.0, 800.0, false).is_mobile_portrait());
    }
}
