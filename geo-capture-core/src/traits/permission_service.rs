use crate::models::permission::{PermissionKind, PermissionStatus};

/// Interface for OS permission prompts.
///
/// `request` may block while a native dialog is shown.
pub trait PermissionService: Send + Sync {
    /// Current status without prompting.
    fn status(&self, kind: PermissionKind) -> PermissionStatus;

    /// Prompt for `kind` (or return the remembered answer) and report the result.
    fn request(&self, kind: PermissionKind) -> PermissionStatus;
}
