//! The attendance screen as a single state value.
//!
//! Every transition consumes the current [`Session`] and returns the next one,
//! so a check-in time can never outlive the signup it belongs to.

use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use crate::common::Coordinate;

/// Where the user was when signup was admitted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SignupFix {
    pub location: Coordinate,
    pub address: Option<String>,
    pub distance_km: f64,
}

impl SignupFix {
    /// Resolved address, or the raw coordinate when geocoding gave nothing.
    pub fn display_location(&self) -> String {
        match &self.address {
            Some(address) => address.clone(),
            None => self.location.display_short(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum Session {
    #[default]
    Locked,
    AwaitingLocation { attempt: Uuid },
    UnlockedOffline { fix: SignupFix },
    UnlockedOnline { fix: SignupFix, checked_in_at: String },
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum TransitionError {
    #[error("a signup attempt is already in progress")]
    SignupInProgress,
    #[error("already signed up")]
    AlreadySignedUp,
    #[error("not signed up")]
    NotSignedUp,
    #[error("no pending signup attempt {0}")]
    NoPendingSignup(Uuid),
}

/// Flat record of the session as the screen shows it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserSession {
    pub location: Option<Coordinate>,
    pub address: Option<String>,
    pub is_signed_up: bool,
    pub check_in_time: Option<String>,
}

impl Session {
    pub fn is_signed_up(&self) -> bool {
        self.fix().is_some()
    }

    pub fn fix(&self) -> Option<&SignupFix> {
        match self {
            Session::UnlockedOffline { fix } | Session::UnlockedOnline { fix, .. } => Some(fix),
            Session::Locked | Session::AwaitingLocation { .. } => None,
        }
    }

    pub fn check_in_time(&self) -> Option<&str> {
        match self {
            Session::UnlockedOnline { checked_in_at, .. } => Some(checked_in_at),
            _ => None,
        }
    }

    pub fn pending_attempt(&self) -> Option<Uuid> {
        match self {
            Session::AwaitingLocation { attempt } => Some(*attempt),
            _ => None,
        }
    }

    /// Locked → AwaitingLocation.
    pub fn begin_signup(self, attempt: Uuid) -> Result<Session, TransitionError> {
        match self {
            Session::Locked => Ok(Session::AwaitingLocation { attempt }),
            Session::AwaitingLocation { .. } => Err(TransitionError::SignupInProgress),
            Session::UnlockedOffline { .. } | Session::UnlockedOnline { .. } => {
                Err(TransitionError::AlreadySignedUp)
            }
        }
    }

    /// Ends `attempt`: an admitted fix unlocks the screen, `None` goes back to Locked.
    pub fn complete_signup(
        self,
        attempt: Uuid,
        admitted: Option<SignupFix>,
    ) -> Result<Session, TransitionError> {
        match self {
            Session::AwaitingLocation { attempt: pending } if pending == attempt => {
                Ok(match admitted {
                    Some(fix) => Session::UnlockedOffline { fix },
                    None => Session::Locked,
                })
            }
            _ => Err(TransitionError::NoPendingSignup(attempt)),
        }
    }

    /// Checking in again while online re-stamps the time.
    pub fn check_in(self, at: String) -> Result<Session, TransitionError> {
        match self {
            Session::UnlockedOffline { fix } | Session::UnlockedOnline { fix, .. } => {
                Ok(Session::UnlockedOnline {
                    fix,
                    checked_in_at: at,
                })
            }
            Session::Locked | Session::AwaitingLocation { .. } => Err(TransitionError::NotSignedUp),
        }
    }

    pub fn check_out(self) -> Result<Session, TransitionError> {
        if self.is_signed_up() {
            Ok(Session::Locked)
        } else {
            Err(TransitionError::NotSignedUp)
        }
    }

    pub fn user_session(&self) -> UserSession {
        let fix = self.fix();
        UserSession {
            location: fix.map(|f| f.location),
            address: fix.and_then(|f| f.address.clone()),
            is_signed_up: fix.is_some(),
            check_in_time: self.check_in_time().map(str::to_string),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fix() -> SignupFix {
        SignupFix {
            location: Coordinate::new(29.5390, 76.9730),
            address: None,
            distance_km: 0.09,
        }
    }

    fn unlocked() -> Session {
        let attempt = Uuid::new_v4();
        Session::Locked
            .begin_signup(attempt)
            .and_then(|s| s.complete_signup(attempt, Some(fix())))
            .unwrap()
    }

    #[test]
    fn rejected_signup_returns_to_locked() {
        let attempt = Uuid::new_v4();
        let session = Session::Locked.begin_signup(attempt).unwrap();
        assert_eq!(session.pending_attempt(), Some(attempt));

        let session = session.complete_signup(attempt, None).unwrap();
        assert_eq!(session, Session::Locked);
        assert_eq!(session.user_session(), Session::default().user_session());
    }

    #[test]
    fn admitted_signup_unlocks_offline() {
        let session = unlocked();
        assert!(matches!(session, Session::UnlockedOffline { .. }));
        let snapshot = session.user_session();
        assert!(snapshot.is_signed_up);
        assert_eq!(snapshot.check_in_time, None);
        assert_eq!(snapshot.location, Some(fix().location));
    }

    #[test]
    fn check_in_then_out_walks_the_loop() {
        let online = unlocked().check_in("9:05 AM".into()).unwrap();
        assert_eq!(online.check_in_time(), Some("9:05 AM"));
        assert!(online.user_session().is_signed_up);

        let again = online.check_in("9:30 AM".into()).unwrap();
        assert_eq!(again.check_in_time(), Some("9:30 AM"));

        let locked = again.check_out().unwrap();
        assert_eq!(locked, Session::Locked);
        let snapshot = locked.user_session();
        assert!(!snapshot.is_signed_up);
        assert_eq!(snapshot.check_in_time, None);
        assert_eq!(snapshot.location, None);
    }

    #[test]
    fn check_out_while_offline_locks() {
        assert_eq!(unlocked().check_out().unwrap(), Session::Locked);
    }

    #[test]
    fn invalid_transitions_are_rejected() {
        let attempt = Uuid::new_v4();
        let awaiting = Session::Locked.begin_signup(attempt).unwrap();

        assert_eq!(
            awaiting.clone().begin_signup(Uuid::new_v4()),
            Err(TransitionError::SignupInProgress)
        );
        assert_eq!(
            awaiting.clone().check_in("9:00 AM".into()),
            Err(TransitionError::NotSignedUp)
        );
        assert_eq!(awaiting.clone().check_out(), Err(TransitionError::NotSignedUp));

        let other = Uuid::new_v4();
        assert_eq!(
            awaiting.complete_signup(other, Some(fix())),
            Err(TransitionError::NoPendingSignup(other))
        );

        assert_eq!(
            unlocked().begin_signup(Uuid::new_v4()),
            Err(TransitionError::AlreadySignedUp)
        );
        assert_eq!(Session::Locked.check_out(), Err(TransitionError::NotSignedUp));
        assert_eq!(
            Session::Locked.complete_signup(attempt, None),
            Err(TransitionError::NoPendingSignup(attempt))
        );
    }

    #[test]
    fn address_falls_back_to_coordinates() {
        assert_eq!(fix().display_location(), "29.5390, 76.9730");
        let named = SignupFix {
            address: Some("Sector 12, Karnal".into()),
            ..fix()
        };
        assert_eq!(named.display_location(), "Sector 12, Karnal");
    }

    #[test]
    fn serializes_with_state_tag() {
        let json = serde_json::to_value(unlocked().check_in("9:05 AM".into()).unwrap()).unwrap();
        assert_eq!(json["state"], "unlocked_online");
        assert_eq!(json["checked_in_at"], "9:05 AM");
    }
}
