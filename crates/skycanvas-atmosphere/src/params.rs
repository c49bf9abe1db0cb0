//! Shader parameter identifiers and their one-time resolution.
//!
//! Materials are written through opaque [`ParameterId`]s rather than names.
//! The updater resolves its three ids on first use and caches them for its
//! lifetime; a name the resolver does not know stays unresolved and every
//! write aimed at it is skipped.

use std::cell::RefCell;
use std::collections::HashMap;

/// Camera position parameter name.
pub const CAMERA_POSITION_OFFSET: &str = "_CameraPositionOffset";
/// Sun override parameter name.
pub const OVERRIDE_SUN: &str = "_OverrideSun";
/// Wind-phase override parameter name.
pub const OVERRIDE_TIME: &str = "_OverrideTime";

/// The parameter names the atmosphere updater publishes.
pub const ATMOSPHERE_PARAMETERS: [&str; 3] =
    [CAMERA_POSITION_OFFSET, OVERRIDE_SUN, OVERRIDE_TIME];

// ---------------------------------------------------------------------------
// ParameterId / ParameterResolver
// ---------------------------------------------------------------------------

/// Opaque handle for a named shader parameter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ParameterId(pub u32);

/// Maps parameter names to ids.
pub trait ParameterResolver {
    /// Resolve `name`, or `None` if the shader system does not know it.
    fn resolve(&self, name: &str) -> Option<ParameterId>;
}

// ---------------------------------------------------------------------------
// ParameterRegistry
// ---------------------------------------------------------------------------

/// Name → id table for shader parameters.
///
/// An open registry interns every name it is asked about, handing out
/// sequential ids. A closed registry only knows the names it was built with.
#[derive(Debug, Default)]
pub struct ParameterRegistry {
    ids: RefCell<HashMap<String, ParameterId>>,
    closed: bool,
}

impl ParameterRegistry {
    /// An open registry that interns on demand.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry that resolves exactly `names` and nothing else.
    pub fn closed<'a>(names: impl IntoIterator<Item = &'a str>) -> Self {
        let mut registry = Self::new();
        for name in names {
            registry.intern(name);
        }
        registry.closed = true;
        registry
    }

    fn intern(&self, name: &str) -> ParameterId {
        let mut ids = self.ids.borrow_mut();
        let next = ParameterId(ids.len() as u32);
        *ids.entry(name.to_owned()).or_insert(next)
    }

    /// Look up without interning.
    pub fn lookup_by_name(&self, name: &str) -> Option<ParameterId> {
        self.ids.borrow().get(name).copied()
    }

    /// Number of known names.
    pub fn len(&self) -> usize {
        self.ids.borrow().len()
    }

    /// Returns `true` if no names are known yet.
    pub fn is_empty(&self) -> bool {
        self.ids.borrow().is_empty()
    }
}

impl ParameterResolver for ParameterRegistry {
    fn resolve(&self, name: &str) -> Option<ParameterId> {
        if self.closed {
            self.lookup_by_name(name)
        } else {
            Some(self.intern(name))
        }
    }
}

// ---------------------------------------------------------------------------
// AtmosphereParameterIds / ParameterState
// ---------------------------------------------------------------------------

/// Resolved ids for the three atmosphere parameters.
///
/// `None` marks a name that failed to resolve.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AtmosphereParameterIds {
    pub camera_position_offset: Option<ParameterId>,
    pub override_sun: Option<ParameterId>,
    pub override_time: Option<ParameterId>,
}

impl AtmosphereParameterIds {
    /// Resolve all three names through `resolver`.
    pub fn resolve(resolver: &dyn ParameterResolver) -> Self {
        let lookup = |name: &str| {
            let id = resolver.resolve(name);
            if id.is_none() {
                tracing::warn!(
                    parameter = name,
                    "shader parameter not found; writes will be skipped"
                );
            }
            id
        };
        Self {
            camera_position_offset: lookup(CAMERA_POSITION_OFFSET),
            override_sun: lookup(OVERRIDE_SUN),
            override_time: lookup(OVERRIDE_TIME),
        }
    }

    /// Returns `true` if every name resolved.
    pub fn is_complete(&self) -> bool {
        self.camera_position_offset.is_some()
            && self.override_sun.is_some()
            && self.override_time.is_some()
    }
}

/// Resolution lifecycle of the cached ids.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ParameterState {
    /// Nothing resolved yet.
    #[default]
    Uninitialized,
    /// Ids resolved; never resolved again.
    Ready(AtmosphereParameterIds),
}

impl ParameterState {
    /// Resolve on first call, then return the cached ids.
    pub fn ensure_resolved(&mut self, resolver: &dyn ParameterResolver) -> AtmosphereParameterIds {
        match *self {
            Self::Ready(ids) => ids,
            Self::Uninitialized => {
                let ids = AtmosphereParameterIds::resolve(resolver);
                tracing::debug!(?ids, "resolved atmosphere parameter ids");
                *self = Self::Ready(ids);
                ids
            }
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }

    /// The cached ids, if resolved.
    pub fn ids(&self) -> Option<AtmosphereParameterIds> {
        match self {
            Self::Ready(ids) => Some(*ids),
            Self::Uninitialized => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;

    /// Counts how often it is asked to resolve.
    struct CountingResolver {
        inner: ParameterRegistry,
        calls: Cell<u32>,
    }

    impl ParameterResolver for CountingResolver {
        fn resolve(&self, name: &str) -> Option<ParameterId> {
            self.calls.set(self.calls.get() + 1);
            self.inner.resolve(name)
        }
    }

    #[test]
    fn test_open_registry_interns_sequentially() {
        let registry = ParameterRegistry::new();
        assert!(registry.is_empty());
        assert_eq!(registry.resolve("_A"), Some(ParameterId(0)));
        assert_eq!(registry.resolve("_B"), Some(ParameterId(1)));
        assert_eq!(registry.resolve("_A"), Some(ParameterId(0)));
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_closed_registry_rejects_unknown() {
        let registry = ParameterRegistry::closed([OVERRIDE_SUN]);
        assert_eq!(registry.resolve(OVERRIDE_SUN), Some(ParameterId(0)));
        assert_eq!(registry.resolve(OVERRIDE_TIME), None);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_lookup_does_not_intern() {
        let registry = ParameterRegistry::new();
        assert_eq!(registry.lookup_by_name("_Missing"), None);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_resolve_all_atmosphere_ids() {
        let registry = ParameterRegistry::new();
        let ids = AtmosphereParameterIds::resolve(&registry);
        assert!(ids.is_complete());
        assert_eq!(ids.camera_position_offset, registry.lookup_by_name(CAMERA_POSITION_OFFSET));
        assert_ne!(ids.override_sun, ids.override_time);
    }

    #[test]
    fn test_missing_name_left_unresolved() {
        let registry = ParameterRegistry::closed([CAMERA_POSITION_OFFSET, OVERRIDE_TIME]);
        let ids = AtmosphereParameterIds::resolve(&registry);
        assert!(!ids.is_complete());
        assert!(ids.override_sun.is_none());
        assert!(ids.camera_position_offset.is_some());
    }

    #[test]
    fn test_state_resolves_once() {
        let resolver = CountingResolver {
            inner: ParameterRegistry::new(),
            calls: Cell::new(0),
        };
        let mut state = ParameterState::default();
        assert!(!state.is_ready());
        assert_eq!(state.ids(), None);

        let first = state.ensure_resolved(&resolver);
        let second = state.ensure_resolved(&resolver);
        assert_eq!(first, second);
        assert!(state.is_ready());
        assert_eq!(resolver.calls.get(), ATMOSPHERE_PARAMETERS.len() as u32);
    }
}
