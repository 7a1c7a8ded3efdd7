pub mod login_history;
pub mod tracker;

mod capability;
