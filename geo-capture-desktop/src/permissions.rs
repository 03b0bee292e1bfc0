//! Desktop permission table.
//!
//! Desktop platforms have no per-app consent dialog for cameras, location or
//! the pictures folder, so answers come from configuration instead of prompts.

use std::collections::HashMap;

use parking_lot::Mutex;

use geo_capture_core::models::permission::{PermissionKind, PermissionStatus};
use geo_capture_core::traits::permission_service::PermissionService;

/// Permission service answering from a fixed table.
///
/// `request` turns an unanswered scope into `default_answer`, so a later
/// `status` reports what was decided.
pub struct StaticPermissions {
    answers: Mutex<HashMap<PermissionKind, PermissionStatus>>,
    default_answer: PermissionStatus,
}

impl StaticPermissions {
    pub fn new(default_answer: PermissionStatus) -> Self {
        Self {
            answers: Mutex::new(HashMap::new()),
            default_answer,
        }
    }

    pub fn grant_all() -> Self {
        Self::new(PermissionStatus::Granted)
    }

    pub fn with(self, kind: PermissionKind, status: PermissionStatus) -> Self {
        self.answers.lock().insert(kind, status);
        self
    }
}

impl PermissionService for StaticPermissions {
    fn status(&self, kind: PermissionKind) -> PermissionStatus {
        self.answers
            .lock()
            .get(&kind)
            .copied()
            .unwrap_or(PermissionStatus::Unknown)
    }

    fn request(&self, kind: PermissionKind) -> PermissionStatus {
        let mut answers = self.answers.lock();
        let status = *answers.entry(kind).or_insert(self.default_answer);
        log::debug!("{} permission: {:?}", kind, status);
        status
    }
}
