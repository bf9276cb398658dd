//! Bijective symbol table.
//!
//! Every name maps to exactly one address and every address to at most one
//! name. [`SymbolTable::define`] is the only way in, and it evicts whatever
//! binding would break that pairing.

use std::collections::BTreeMap;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SymbolTable {
    by_name: BTreeMap<String, u64>,
    by_addr: BTreeMap<u64, String>,
}

/// What a call to [`SymbolTable::define`] replaced.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Redefinition {
    /// Previous address of the defined name.
    pub old_addr: Option<u64>,
    /// Name that previously sat at the target address.
    pub evicted: Option<String>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `name` to `addr`.
    ///
    /// The stale reverse entry of `name`'s previous address is dropped first,
    /// then any other name bound to `addr` is unbound.
    pub fn define(&mut self, name: impl Into<String>, addr: u64) -> Redefinition {
        let name = name.into();
        let mut change = Redefinition::default();

        if let Some(old) = self.by_name.get(&name).copied() {
            self.by_addr.remove(&old);
            change.old_addr = Some(old);
        }

        if let Some(other) = self.by_addr.get(&addr)
            && *other != name
        {
            self.by_name.remove(other);
            change.evicted = Some(other.clone());
        }

        self.by_addr.insert(addr, name.clone());
        self.by_name.insert(name, addr);
        change
    }

    pub fn address_of(&self, name: &str) -> Option<u64> {
        self.by_name.get(name).copied()
    }

    pub fn name_at(&self, addr: u64) -> Option<&str> {
        self.by_addr.get(&addr).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }

    /// Symbols in name order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.by_name.keys().map(String::as_str)
    }

    /// `(address, name)` pairs in address order.
    pub fn by_address(&self) -> impl Iterator<Item = (u64, &str)> {
        self.by_addr.iter().map(|(addr, name)| (*addr, name.as_str()))
    }

    /// Name to address mapping, as persisted in the database.
    pub fn to_map(&self) -> BTreeMap<String, u64> {
        self.by_name.clone()
    }
}

impl FromIterator<(String, u64)> for SymbolTable {
    fn from_iter<I: IntoIterator<Item = (String, u64)>>(iter: I) -> Self {
        let mut table = Self::new();
        for (name, addr) in iter {
            table.define(name, addr);
        }
        table
    }
}
