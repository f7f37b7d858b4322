//! Wire types for the settings/events side of the bridge.

use serde::Deserialize;
use snapbooth_core::concept::Concept;
use snapbooth_core::settings::BoothSettings;

/// Response of `?action=getSettings`.
///
/// `settings` may be partial; unknown or missing fields fall back to
/// [`BoothSettings`] defaults. `concepts` is the curated theme list the
/// kiosk offers.
#[derive(Debug, Clone, Deserialize)]
pub struct SettingsEnvelope {
    pub ok: bool,
    #[serde(default)]
    pub settings: BoothSettings,
    #[serde(default)]
    pub concepts: Vec<Concept>,
}

/// One entry of `?action=getEvents`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventInfo {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub folder_id: String,
    #[serde(default)]
    pub is_active: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_tolerates_partial_settings() {
        let envelope: SettingsEnvelope = serde_json::from_str(
            r#"{"ok":true,"settings":{"boothMode":"video","overlayImage":"https://x/o.png"}}"#,
        )
        .unwrap();
        assert!(envelope.ok);
        assert_eq!(
            envelope.settings.booth_mode,
            snapbooth_core::settings::BoothMode::Video
        );
        assert!(envelope.concepts.is_empty());
    }

    #[test]
    fn event_list_parses() {
        let events: Vec<EventInfo> = serde_json::from_str(
            r#"[{"id":"ev-1","name":"Gala","folderId":"f1","isActive":true},
                {"id":"ev-2","name":"Expo"}]"#,
        )
        .unwrap();
        assert_eq!(events.len(), 2);
        assert!(events[0].is_active);
        assert!(!events[1].is_active);
        assert!(events[1].folder_id.is_empty());
    }
}
