//! Capability set granted to generated documents.

use std::fmt;

/// A single iframe sandbox capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum SandboxPermission {
    Scripts,
    SameOrigin,
    PointerLock,
    Forms,
    Modals,
}

impl SandboxPermission {
    /// Token as written in a `sandbox` attribute.
    pub fn token(&self) -> &'static str {
        match self {
            SandboxPermission::Scripts => "allow-scripts",
            SandboxPermission::SameOrigin => "allow-same-origin",
            SandboxPermission::PointerLock => "allow-pointer-lock",
            SandboxPermission::Forms => "allow-forms",
            SandboxPermission::Modals => "allow-modals",
        }
    }
}

/// The permissions a preview frame runs with. Anything not listed
/// (top-level navigation, popups, downloads) stays denied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SandboxPolicy {
    permissions: Vec<SandboxPermission>,
}

impl SandboxPolicy {
    /// Fully locked down: no capability granted.
    pub fn locked() -> Self {
        Self {
            permissions: Vec::new(),
        }
    }

    /// What games need: scripts, same-origin storage, pointer lock, forms
    /// and modal dialogs.
    pub fn preview() -> Self {
        Self::locked()
            .allow(SandboxPermission::Scripts)
            .allow(SandboxPermission::SameOrigin)
            .allow(SandboxPermission::PointerLock)
            .allow(SandboxPermission::Forms)
            .allow(SandboxPermission::Modals)
    }

    pub fn allow(mut self, permission: SandboxPermission) -> Self {
        if !self.permissions.contains(&permission) {
            self.permissions.push(permission);
        }
        self
    }

    pub fn allows(&self, permission: SandboxPermission) -> bool {
        self.permissions.contains(&permission)
    }

    /// Value for an iframe `sandbox` attribute.
    pub fn attribute(&self) -> String {
        self.permissions
            .iter()
            .map(SandboxPermission::token)
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Value for a `Content-Security-Policy` header that applies the same
    /// sandbox when the document is opened outside the host page.
    pub fn csp_header(&self) -> String {
        let attribute = self.attribute();
        if attribute.is_empty() {
            "sandbox".to_string()
        } else {
            format!("sandbox {attribute}")
        }
    }
}

impl Default for SandboxPolicy {
    fn default() -> Self {
        Self::preview()
    }
}

impl fmt::Display for SandboxPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.attribute())
    }
}
