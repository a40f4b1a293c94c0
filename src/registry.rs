//! The registry built by one discovery pass.
//!
//! An insertion-ordered collection of plugs keyed by address. A target string
//! resolves against it with address-exact-match precedence; an alias is only
//! consulted when no address matches, and the first alias match in registry
//! order wins (aliases are not guaranteed unique).

use std::iter::FromIterator;

use crate::devices::SmartPlug;

#[derive(Default)]
pub struct Registry {
    plugs: Vec<SmartPlug>,
}

impl Registry {
    pub fn new() -> Registry {
        Registry::default()
    }

    /// Add a plug, replacing any earlier entry with the same address.
    pub fn insert(&mut self, plug: SmartPlug) {
        match self.plugs.iter().position(|p| p.addr() == plug.addr()) {
            Some(index) => self.plugs[index] = plug,
            None => self.plugs.push(plug),
        }
    }

    pub fn len(&self) -> usize {
        self.plugs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plugs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SmartPlug> {
        self.plugs.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut SmartPlug> {
        self.plugs.iter_mut()
    }

    /// Resolve a target string, which is either an address or an alias.
    /// `None` is the user-visible "not found" outcome, never an error.
    pub fn find(&self, target: &str) -> Option<&SmartPlug> {
        let index = self.position(target)?;
        self.plugs.get(index)
    }

    pub fn find_mut(&mut self, target: &str) -> Option<&mut SmartPlug> {
        let index = self.position(target)?;
        self.plugs.get_mut(index)
    }

    fn position(&self, target: &str) -> Option<usize> {
        self.plugs
            .iter()
            .position(|plug| plug.addr().to_string() == target)
            .or_else(|| self.plugs.iter().position(|plug| plug.alias() == target))
    }
}

impl FromIterator<SmartPlug> for Registry {
    fn from_iter<I: IntoIterator<Item = SmartPlug>>(iter: I) -> Registry {
        let mut registry = Registry::new();
        for plug in iter {
            registry.insert(plug);
        }
        registry
    }
}
