use std::fmt;

use serde::{Serialize, Serializer};

/// User-facing message raised by a screen action.
#[derive(Debug, Clone, PartialEq)]
pub enum Notice {
    PermissionDenied,
    LocationUnavailable,
    LocationError { message: String },
    TooFar { distance_km: f64, radius_km: f64 },
    SignedUp,
    CheckedIn { time: String },
    CheckedOut { time: String },
}

impl Notice {
    pub fn kind(&self) -> &'static str {
        match self {
            Notice::PermissionDenied => "permission_denied",
            Notice::LocationUnavailable => "location_unavailable",
            Notice::LocationError { .. } => "location_error",
            Notice::TooFar { .. } => "too_far",
            Notice::SignedUp => "signed_up",
            Notice::CheckedIn { .. } => "checked_in",
            Notice::CheckedOut { .. } => "checked_out",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Notice::PermissionDenied => "Permission Denied",
            Notice::LocationUnavailable => "Location Unavailable",
            Notice::LocationError { .. } => "Location Error",
            Notice::TooFar { .. } => "Too Far",
            Notice::SignedUp => "Success",
            Notice::CheckedIn { .. } => "Checked In",
            Notice::CheckedOut { .. } => "Checked Out",
        }
    }

    pub fn message(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::PermissionDenied => write!(
                f,
                "Location permission is required. Please enable it in your device settings."
            ),
            Notice::LocationUnavailable => write!(
                f,
                "Could not determine your current location. Make sure location services are enabled and try again."
            ),
            Notice::LocationError { message } => write!(f, "{}", message),
            Notice::TooFar {
                distance_km,
                radius_km,
            } => write!(
                f,
                "You must be within {}km. You are {:.2}km away.",
                radius_km, distance_km
            ),
            Notice::SignedUp => write!(f, "Signed up successfully!"),
            Notice::CheckedIn { time } => write!(f, "Time: {}", time),
            Notice::CheckedOut { time } => write!(f, "Time: {}\nLogging out...", time),
        }
    }
}

#[derive(Serialize)]
struct NoticeBody<'a> {
    kind: &'a str,
    title: &'a str,
    message: String,
}

impl Serialize for Notice {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        NoticeBody {
            kind: self.kind(),
            title: self.title(),
            message: self.message(),
        }
        .serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn too_far_carries_distance_at_two_decimals() {
        let notice = Notice::TooFar {
            distance_km: 5.004_2,
            radius_km: 1.0,
        };
        assert_eq!(notice.message(), "You must be within 1km. You are 5.00km away.");
    }

    #[test]
    fn serializes_kind_title_and_message() {
        let json = serde_json::to_value(Notice::CheckedIn {
            time: "9:05 AM".into(),
        })
        .unwrap();
        assert_eq!(json["kind"], "checked_in");
        assert_eq!(json["title"], "Checked In");
        assert_eq!(json["message"], "Time: 9:05 AM");
    }
}
