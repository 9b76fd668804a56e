use serde::Serialize;

/// What the engine reports to its host through the event bus.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum EngineEvent {
    Mounted { width: f64, height: f64 },
    AssetReady { parts: usize, anchors: usize, clips: usize },
    AssetFailed { reason: String },
    FrameFailed { reason: String },
    /// Control commands lost to inbox overflow since the last frame.
    CommandsDropped { count: usize },
    TornDown { frames: u64 },
}

#[cfg(test)]
mod tests {
    use super::EngineEvent;

    #[test]
    fn serializes_with_event_tag() {
        let json = serde_json::to_string(&EngineEvent::AssetFailed {
            reason: "404".into(),
        })
        .unwrap();
        assert_eq!(json, r#"{"event":"asset_failed","reason":"404"}"#);
    }
}
