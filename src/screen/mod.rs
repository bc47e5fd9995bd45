//! Screen controller: owns the one session and runs the signup flow.

mod notice;

use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::{Local, NaiveTime};
use serde::Serialize;
use uuid::Uuid;

use crate::device::{LocationDevice, LocationError, PermissionStatus};
use crate::geofence::Geofence;
use crate::session::{Session, SignupFix, TransitionError};
use crate::view::{self, ScreenView};

pub use notice::Notice;

/// 12-hour clock without a leading zero, e.g. "9:05 AM".
pub const CHECK_TIME_FORMAT: &str = "%-I:%M %p";

pub fn format_check_time(time: NaiveTime) -> String {
    time.format(CHECK_TIME_FORMAT).to_string()
}

pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveTime;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveTime {
        Local::now().time()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveTime {
        self.0
    }
}

/// Result of a screen action: what to tell the user and the session it left behind.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScreenOutcome {
    pub notice: Notice,
    pub session: Session,
}

pub struct Screen {
    geofence: Geofence,
    clock: Box<dyn Clock>,
    session: Mutex<Session>,
}

// 签到尝试未完成就被丢弃时，恢复为 Locked
struct PendingSignup<'a> {
    screen: &'a Screen,
    attempt: Uuid,
    settled: bool,
}

impl PendingSignup<'_> {
    fn settle(mut self, admitted: Option<SignupFix>) -> Result<Session, TransitionError> {
        self.settled = true;
        self.screen
            .transition(|session| session.complete_signup(self.attempt, admitted))
    }
}

impl Drop for PendingSignup<'_> {
    fn drop(&mut self) {
        if self.settled {
            return;
        }
        let mut session = self.screen.lock();
        if session.pending_attempt() == Some(self.attempt) {
            tracing::warn!(attempt = %self.attempt, "Signup attempt dropped, relocking screen");
            *session = Session::Locked;
        }
    }
}

impl Screen {
    pub fn new(geofence: Geofence) -> Self {
        Self::with_clock(geofence, SystemClock)
    }

    pub fn with_clock(geofence: Geofence, clock: impl Clock + 'static) -> Self {
        Self {
            geofence,
            clock: Box::new(clock),
            session: Mutex::new(Session::Locked),
        }
    }

    pub fn geofence(&self) -> &Geofence {
        &self.geofence
    }

    pub fn session(&self) -> Session {
        self.lock().clone()
    }

    pub fn view(&self) -> ScreenView {
        view::render(&self.session(), &self.geofence)
    }

    fn lock(&self) -> MutexGuard<'_, Session> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn transition<F>(&self, apply: F) -> Result<Session, TransitionError>
    where
        F: FnOnce(Session) -> Result<Session, TransitionError>,
    {
        let mut session = self.lock();
        let next = apply(session.clone())?;
        *session = next.clone();
        Ok(next)
    }

    /// Runs one signup attempt against `device`.
    ///
    /// Device failures end the attempt with a notice and leave the screen
    /// locked; only a second concurrent signup or an already unlocked screen
    /// is an error.
    #[tracing::instrument(skip_all, fields(attempt))]
    pub async fn signup(&self, device: &dyn LocationDevice) -> Result<ScreenOutcome, TransitionError> {
        let attempt = Uuid::new_v4();
        tracing::Span::current().record("attempt", tracing::field::display(attempt));

        self.transition(|session| session.begin_signup(attempt))?;
        let pending = PendingSignup {
            screen: self,
            attempt,
            settled: false,
        };

        let (notice, admitted) = self.locate(device).await;
        let session = pending.settle(admitted)?;
        tracing::info!("Signup finished: {}", notice.kind());

        Ok(ScreenOutcome { notice, session })
    }

    async fn locate(&self, device: &dyn LocationDevice) -> (Notice, Option<SignupFix>) {
        if device.request_permission().await == PermissionStatus::Denied {
            tracing::info!("Location permission denied");
            return (Notice::PermissionDenied, None);
        }

        let location = match device.current_coordinate().await {
            Ok(location) => location,
            Err(LocationError::Unavailable) => {
                tracing::warn!("Current location unavailable");
                return (Notice::LocationUnavailable, None);
            }
            Err(LocationError::Device(message)) => {
                tracing::error!("Location error: {}", message);
                return (Notice::LocationError { message }, None);
            }
        };

        // 逆地理编码失败不影响围栏判断
        let address = match device.reverse_geocode(location).await {
            Ok(address) => address,
            Err(err) => {
                tracing::warn!("Reverse geocode failed: {}", err);
                None
            }
        };

        let decision = self.geofence.evaluate(location);
        tracing::debug!(
            "Location {:?} is {:.3} km from the office (radius {} km)",
            location,
            decision.distance_km,
            self.geofence.radius_km
        );

        if decision.admitted {
            let fix = SignupFix {
                location,
                address,
                distance_km: decision.distance_km,
            };
            (Notice::SignedUp, Some(fix))
        } else {
            let notice = Notice::TooFar {
                distance_km: decision.distance_km,
                radius_km: self.geofence.radius_km,
            };
            (notice, None)
        }
    }

    pub fn check_in(&self) -> Result<ScreenOutcome, TransitionError> {
        let time = format_check_time(self.clock.now());
        let session = self.transition(|session| session.check_in(time.clone()))?;
        tracing::info!("Checked in at {}", time);
        Ok(ScreenOutcome {
            notice: Notice::CheckedIn { time },
            session,
        })
    }

    pub fn check_out(&self) -> Result<ScreenOutcome, TransitionError> {
        let time = format_check_time(self.clock.now());
        let session = self.transition(Session::check_out)?;
        tracing::info!("Checked out at {}", time);
        Ok(ScreenOutcome {
            notice: Notice::CheckedOut { time },
            session,
        })
    }
}
