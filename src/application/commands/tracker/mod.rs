mod heartbeat;
mod login;
mod logout;
mod service;

pub use login::{ClientInfo, FailedLoginEvent, LoginEvent};
pub use service::LoginTracker;
