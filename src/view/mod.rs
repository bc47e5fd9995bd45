//! View model for the handset shell. Derived entirely from the session.

use serde::Serialize;

use crate::common::Coordinate;
use crate::geofence::Geofence;
use crate::session::Session;

pub const APP_HEADER: &str = "Attendance App";

// 地图初始范围（度）
const MAP_REGION_DELTA: f64 = 0.01;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapRegion {
    pub center: Coordinate,
    pub latitude_delta: f64,
    pub longitude_delta: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    pub title: String,
    pub coordinate: Coordinate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pin_color: Option<&'static str>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScreenAction {
    CheckIn,
    CheckOut,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Footer {
    pub online: bool,
    pub status_text: String,
    pub location_text: String,
    pub actions: Vec<ScreenAction>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum ScreenView {
    Locked {
        header: String,
        signup_label: String,
        signup_enabled: bool,
    },
    Unlocked {
        region: MapRegion,
        markers: Vec<Marker>,
        footer: Footer,
    },
}

impl ScreenView {
    pub fn signup_enabled(&self) -> bool {
        matches!(
            self,
            ScreenView::Locked {
                signup_enabled: true,
                ..
            }
        )
    }
}

pub fn render(session: &Session, geofence: &Geofence) -> ScreenView {
    let (fix, check_in_time) = match session {
        Session::Locked | Session::AwaitingLocation { .. } => {
            let awaiting = session.pending_attempt().is_some();
            return ScreenView::Locked {
                header: APP_HEADER.to_string(),
                signup_label: if awaiting {
                    "LOCATING...".to_string()
                } else {
                    format!("SIGNUP (WITHIN {}KM)", geofence.radius_km)
                },
                signup_enabled: !awaiting,
            };
        }
        Session::UnlockedOffline { fix } => (fix, None),
        Session::UnlockedOnline { fix, checked_in_at } => (fix, Some(checked_in_at)),
    };

    let status_text = match check_in_time {
        Some(time) => format!("Status: Online - Checked in at: {}", time),
        None => "Status: Offline".to_string(),
    };

    ScreenView::Unlocked {
        region: MapRegion {
            center: fix.location,
            latitude_delta: MAP_REGION_DELTA,
            longitude_delta: MAP_REGION_DELTA,
        },
        markers: vec![
            Marker {
                title: "Office".to_string(),
                coordinate: geofence.office,
                pin_color: Some("blue"),
            },
            Marker {
                title: fix.address.clone().unwrap_or_else(|| "You".to_string()),
                coordinate: fix.location,
                pin_color: None,
            },
        ],
        footer: Footer {
            online: check_in_time.is_some(),
            status_text,
            location_text: format!("Location: {}", fix.display_location()),
            actions: vec![ScreenAction::CheckIn, ScreenAction::CheckOut],
        },
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;
    use crate::session::SignupFix;

    fn fix(address: Option<&str>) -> SignupFix {
        SignupFix {
            location: Coordinate::new(29.53901, 76.97297),
            address: address.map(str::to_string),
            distance_km: 0.1,
        }
    }

    #[test]
    fn locked_gate_names_the_radius() {
        let view = render(&Session::Locked, &Geofence::default());
        assert_eq!(
            view,
            ScreenView::Locked {
                header: "Attendance App".into(),
                signup_label: "SIGNUP (WITHIN 1KM)".into(),
                signup_enabled: true,
            }
        );
        assert!(view.signup_enabled());
    }

    #[test]
    fn awaiting_location_disables_signup() {
        let session = Session::AwaitingLocation {
            attempt: Uuid::new_v4(),
        };
        assert!(!render(&session, &Geofence::default()).signup_enabled());
    }

    #[test]
    fn offline_footer_falls_back_to_coordinates() {
        let session = Session::UnlockedOffline { fix: fix(None) };
        let ScreenView::Unlocked { region, markers, footer } = render(&session, &Geofence::default())
        else {
            panic!("expected unlocked view");
        };

        assert_eq!(region.center, fix(None).location);
        assert_eq!(region.latitude_delta, 0.01);
        assert_eq!(markers[0].title, "Office");
        assert_eq!(markers[0].pin_color, Some("blue"));
        assert_eq!(markers[1].title, "You");
        assert!(!footer.online);
        assert_eq!(footer.status_text, "Status: Offline");
        assert_eq!(footer.location_text, "Location: 29.5390, 76.9730");
        assert_eq!(footer.actions, vec![ScreenAction::CheckIn, ScreenAction::CheckOut]);
    }

    #[test]
    fn online_footer_shows_check_in_time_and_address() {
        let session = Session::UnlockedOnline {
            fix: fix(Some("Sector 12, Karnal")),
            checked_in_at: "9:05 AM".into(),
        };
        let ScreenView::Unlocked { markers, footer, .. } = render(&session, &Geofence::default())
        else {
            panic!("expected unlocked view");
        };

        assert_eq!(markers[1].title, "Sector 12, Karnal");
        assert!(footer.online);
        assert_eq!(footer.status_text, "Status: Online - Checked in at: 9:05 AM");
        assert_eq!(footer.location_text, "Location: Sector 12, Karnal");
    }
}
