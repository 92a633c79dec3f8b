//! The installed-package inventory.

use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, BTreeSet};

/// Mapping from installed package name to the import identifiers it
/// provides.
///
/// Backed by ordered collections so iteration, and every report built from
/// it, is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Inventory {
    packages: BTreeMap<String, BTreeSet<String>>,
}

impl Inventory {
    /// Create an empty inventory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `package` as providing `import_names`.
    ///
    /// A package seen again (for example in a second site-packages
    /// directory) has its identifiers unioned with the previous ones. With
    /// no identifiers at all, the package name itself is used.
    pub fn add<I, S>(&mut self, package: &str, import_names: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: BTreeSet<String> = import_names.into_iter().map(Into::into).collect();
        let names = if names.is_empty() {
            BTreeSet::from([package.to_string()])
        } else {
            names
        };

        match self.packages.entry(package.to_string()) {
            Entry::Occupied(mut existing) => existing.get_mut().extend(names),
            Entry::Vacant(slot) => {
                slot.insert(names);
            }
        }
    }

    /// Import identifiers of `package`, if installed.
    pub fn get(&self, package: &str) -> Option<&BTreeSet<String>> {
        self.packages.get(package)
    }

    /// Iterate over `(package, import identifiers)` in package-name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &BTreeSet<String>)> {
        self.packages
            .iter()
            .map(|(name, imports)| (name.as_str(), imports))
    }

    pub fn len(&self) -> usize {
        self.packages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }
}

impl<P, I, S> FromIterator<(P, I)> for Inventory
where
    P: AsRef<str>,
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (P, I)>>(iter: T) -> Self {
        let mut inventory = Self::new();
        for (package, imports) in iter {
            inventory.add(package.as_ref(), imports);
        }
        inventory
    }
}
