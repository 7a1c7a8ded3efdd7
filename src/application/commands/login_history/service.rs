use std::sync::Arc;

use crate::domain::login::LoginRecordRepository;

pub struct LoginHistoryCommandService {
    pub(super) repo: Arc<dyn LoginRecordRepository>,
}

impl LoginHistoryCommandService {
    pub fn new(repo: Arc<dyn LoginRecordRepository>) -> Self {
        Self { repo }
    }
}
