pub mod login_history;
