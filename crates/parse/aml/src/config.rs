//! Decoder policies.

use alloc::string::String;

/// Default value bound at `\_OS`.
pub const DEFAULT_OS_NAME: &str = "Microsoft Windows NT";

/// Default limit on opcode and invocation nesting.
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// What happens when a definition names an already-bound node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RedefinitionPolicy {
    /// The new object replaces the old one.
    #[default]
    Replace,
    /// The first definition wins; later ones are dropped.
    KeepExisting,
    /// The decode fails with [`AmlError::DuplicateName`](crate::AmlError::DuplicateName).
    Reject,
}

/// When method bodies are decoded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MethodBodies {
    /// While decoding the table, with the method path as scope.
    #[default]
    Eager,
    /// Stored as raw bytecode until
    /// [`AmlContext::parse_deferred_methods`](crate::AmlContext::parse_deferred_methods).
    Deferred,
}

/// Settings for an [`AmlContext`](crate::AmlContext).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecoderConfig {
    /// String bound at `\_OS`.
    pub os_name: String,
    /// Duplicate-definition handling.
    pub redefinition: RedefinitionPolicy,
    /// Method body decoding mode.
    pub method_bodies: MethodBodies,
    /// Fail with `InvalidLength` when a bounded block is not fully consumed.
    pub exact_block_length: bool,
    /// Accept packages with fewer encoded elements than declared.
    pub allow_short_packages: bool,
    /// Deepest opcode and invocation nesting accepted before the decode
    /// fails.
    pub max_depth: usize,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            os_name: String::from(DEFAULT_OS_NAME),
            redefinition: RedefinitionPolicy::default(),
            method_bodies: MethodBodies::default(),
            exact_block_length: true,
            allow_short_packages: false,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl DecoderConfig {
    /// Sets the `\_OS` string.
    #[must_use]
    pub fn with_os_name(mut self, os_name: impl Into<String>) -> Self {
        self.os_name = os_name.into();
        self
    }

    /// Sets the redefinition policy.
    #[must_use]
    pub fn with_redefinition(mut self, policy: RedefinitionPolicy) -> Self {
        self.redefinition = policy;
        self
    }

    /// Sets the method body decoding mode.
    #[must_use]
    pub fn with_method_bodies(mut self, mode: MethodBodies) -> Self {
        self.method_bodies = mode;
        self
    }

    /// Enables or disables exact block consumption checks.
    #[must_use]
    pub fn with_exact_block_length(mut self, exact: bool) -> Self {
        self.exact_block_length = exact;
        self
    }

    /// Enables or disables short package element lists.
    #[must_use]
    pub fn with_short_packages(mut self, allow: bool) -> Self {
        self.allow_short_packages = allow;
        self
    }

    /// Sets the nesting limit.
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = DecoderConfig::default();
        assert_eq!(config.os_name, DEFAULT_OS_NAME);
        assert_eq!(config.redefinition, RedefinitionPolicy::Replace);
        assert_eq!(config.method_bodies, MethodBodies::Eager);
        assert!(config.exact_block_length);
        assert!(!config.allow_short_packages);
        assert_eq!(config.max_depth, DEFAULT_MAX_DEPTH);
    }

    #[test]
    fn builder_overrides() {
        let config = DecoderConfig::default()
            .with_os_name("Linux")
            .with_redefinition(RedefinitionPolicy::Reject)
            .with_method_bodies(MethodBodies::Deferred)
            .with_exact_block_length(false)
            .with_short_packages(true)
            .with_max_depth(16);
        assert_eq!(config.os_name, "Linux");
        assert_eq!(config.redefinition, RedefinitionPolicy::Reject);
        assert_eq!(config.method_bodies, MethodBodies::Deferred);
        assert!(!config.exact_block_length);
        assert!(config.allow_short_packages);
        assert_eq!(config.max_depth, 16);
    }
}
