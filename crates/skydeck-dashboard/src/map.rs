//! Map-widget state for the detail view.
//!
//! The actual tile rendering happens in an external widget; this module only
//! decides whether it gets a marker or a static explanatory message. A
//! missing credential or an unresolvable center must never blank the rest of
//! the detail view.

use skydeck_weather::Coordinates;

#[derive(Debug, Clone, PartialEq)]
pub enum MapView {
    Marker { center: Coordinates, label: String },
    Unavailable { message: String },
}

impl MapView {
    pub fn resolve(credential: Option<&str>, center: Option<Coordinates>, label: &str) -> Self {
        let Some(_key) = credential.filter(|c| !c.is_empty()) else {
            return MapView::Unavailable {
                message: "Map API key missing. Add a map credential to your configuration to see this location on a map.".to_string(),
            };
        };

        match center {
            Some(center) => MapView::Marker {
                center,
                label: label.to_string(),
            },
            None => MapView::Unavailable {
                message: format!("Map position unknown for {}.", label),
            },
        }
    }

    pub fn is_marker(&self) -> bool {
        matches!(self, MapView::Marker { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_credential_renders_message() {
        let map = MapView::resolve(None, Some(Coordinates::new(1.0, 2.0)), "London");
        assert!(!map.is_marker());
        assert!(matches!(
            map,
            MapView::Unavailable { ref message } if message.contains("Map API key missing")
        ));
    }

    #[test]
    fn test_empty_credential_counts_as_missing() {
        let map = MapView::resolve(Some(""), Some(Coordinates::new(1.0, 2.0)), "London");
        assert!(!map.is_marker());
    }

    #[test]
    fn test_unknown_center_renders_message() {
        let map = MapView::resolve(Some("key"), None, "Atlantis");
        assert!(matches!(
            map,
            MapView::Unavailable { ref message } if message.contains("Atlantis")
        ));
    }

    #[test]
    fn test_marker_with_credential_and_center() {
        let map = MapView::resolve(Some("key"), Some(Coordinates::new(38.72, -9.14)), "Lisbon");
        match map {
            MapView::Marker { center, label } => {
                assert_eq!(center.latitude, 38.72);
                assert_eq!(label, "Lisbon");
            }
            other => panic!("Expected marker, got {:?}", other),
        }
    }
}
