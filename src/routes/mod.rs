pub mod geofence;
pub mod health;
pub mod screen;
