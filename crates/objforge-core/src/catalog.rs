//! Class catalogs — the namespace abstraction behind bulk population.
//!
//! A [`ClassCatalog`] stands in for "a namespace that can enumerate its class
//! definitions". The registry does not care how the enumeration happens:
//! a hand-written [`StaticCatalog`] built at startup, link-time collection
//! (see the `objforge-inventory` crate), or anything else implementing the
//! trait.

use crate::error::FactoryError;
use crate::registry::{MemoryClassRegistry, Registration};
use crate::types::ClassDef;

/// A source of class definitions — one logical library.
pub trait ClassCatalog: Send + Sync {
    /// The library name; every entry from this catalog is registered with it
    /// as the `library` qualifier.
    fn library(&self) -> &str;

    /// Enumerate the definitions this catalog exports.
    ///
    /// Failures should be reported as [`FactoryError::Catalog`].
    fn entries(&self) -> Result<Vec<CatalogEntry>, FactoryError>;
}

/// One discoverable definition inside a catalog.
#[derive(Debug, Clone)]
pub struct CatalogEntry {
    /// Primary lookup name (typically the type name).
    pub name: String,
    /// Optional label for intentional multi-registration under one name.
    pub label: Option<String>,
    /// The constructible definition.
    pub class_def: ClassDef,
}

impl CatalogEntry {
    /// An unlabeled entry.
    pub fn new(name: impl Into<String>, class_def: ClassDef) -> Self {
        Self {
            name: name.into(),
            label: None,
            class_def,
        }
    }

    /// Attach a label.
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

// ─── Static catalog ───────────────────────────────────────────────────────────

/// An explicit registration list built at startup.
pub struct StaticCatalog {
    library: String,
    entries: Vec<CatalogEntry>,
}

impl StaticCatalog {
    /// An empty catalog for `library`.
    pub fn new(library: impl Into<String>) -> Self {
        Self {
            library: library.into(),
            entries: Vec::new(),
        }
    }

    /// Add an entry.
    pub fn with(mut self, entry: CatalogEntry) -> Self {
        self.entries.push(entry);
        self
    }
}

impl ClassCatalog for StaticCatalog {
    fn library(&self) -> &str {
        &self.library
    }

    fn entries(&self) -> Result<Vec<CatalogEntry>, FactoryError> {
        Ok(self.entries.clone())
    }
}

// ─── Bulk population ──────────────────────────────────────────────────────────

impl MemoryClassRegistry {
    /// Bulk-populate from one catalog; returns the number of entries
    /// registered. Functionally equivalent to one [`register`] call per
    /// discovered definition, so re-filling from an unchanged catalog
    /// overwrites each entry with an identical definition and leaves the
    /// resolvable key set intact.
    ///
    /// The catalog is enumerated in full before anything is registered, so a
    /// failed enumeration registers nothing from this catalog. Entries
    /// already present from earlier registrations are unaffected either way.
    ///
    /// [`register`]: Self::register
    pub fn fill_from(&self, catalog: &dyn ClassCatalog) -> Result<usize, FactoryError> {
        let library = catalog.library().to_string();
        let entries = match catalog.entries() {
            Ok(entries) => entries,
            Err(err) => {
                tracing::error!(library = %library, error = %err, "catalog enumeration failed");
                return Err(err);
            }
        };

        let count = entries.len();
        for entry in entries {
            let mut registration = Registration::new(entry.name, entry.class_def)
                .library(&library)
                .source(&library);
            registration.label = entry.label;
            self.register(registration)?;
        }
        tracing::debug!(library = %library, count, "registry filled from catalog");
        Ok(count)
    }

    /// Bulk-populate from several catalogs, stopping at the first failure.
    /// Entries from catalogs processed before the failure remain registered.
    pub fn fill_from_all(&self, catalogs: &[&dyn ClassCatalog]) -> Result<usize, FactoryError> {
        let mut count = 0;
        for catalog in catalogs {
            count += self.fill_from(*catalog)?;
        }
        Ok(count)
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────
