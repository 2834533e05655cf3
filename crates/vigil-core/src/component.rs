//! Backend-agnostic view of a remote status component.

use crate::severity::Severity;

/// A monitorable entity as known to a status backend.
///
/// Cached locally by the reconciler and refreshed wholesale; individual
/// fields are never merged in place.
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteComponent {
    /// Opaque backend-assigned identifier.
    pub id: String,
    /// Display name, matched case-sensitively against monitor configs.
    pub name: String,
    pub group_id: Option<String>,
    pub description: Option<String>,
    pub status: Severity,
    /// Whether the component is showcased on the public page.
    pub showcase: bool,
    pub only_show_if_degraded: bool,
}
