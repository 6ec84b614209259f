//! objforge-inventory — link-time class discovery for the ObjForge registry.
//!
//! Rust has no runtime module scanning, so "walk a namespace and register
//! every class in it" becomes link-time collection: crates submit
//! [`ClassSubmission`] records with [`submit_class!`], and [`populate`]
//! bulk-registers whatever ended up in the link unit.
//!
//! ```rust
//! use objforge_core::{BuildArgs, Instance, FactoryError, MemoryClassRegistry, Selector};
//! use objforge_inventory::{populate, submit_class};
//!
//! struct NullSink;
//!
//! fn build_null_sink(_args: &BuildArgs) -> Result<Instance, FactoryError> {
//!     Ok(Box::new(NullSink))
//! }
//!
//! submit_class! {
//!     library: "sinks",
//!     name: "NullSink",
//!     construct: build_null_sink,
//! }
//!
//! fn main() {
//!     let registry = MemoryClassRegistry::new();
//!     populate(&registry).unwrap();
//!
//!     let sink = registry
//!         .create(&Selector::new("nullsink").library("sinks"), &BuildArgs::new())
//!         .unwrap();
//!     assert!(sink.downcast::<NullSink>().is_ok());
//! }
//! ```

use objforge_core::{
    BuildArgs, CatalogEntry, ClassCatalog, ClassDef, FactoryError, Instance, MemoryClassRegistry,
};

#[doc(hidden)]
pub use ::inventory;

/// A class definition submitted at link time.
///
/// Prefer [`submit_class!`] over constructing these by hand.
pub struct ClassSubmission {
    /// The library this definition belongs to (its originating crate or
    /// module, by convention).
    pub library: &'static str,
    /// Primary lookup name, typically the type name.
    pub name: &'static str,
    /// Optional label for intentional multi-registration under one name.
    pub label: Option<&'static str>,
    /// The constructor.
    pub construct: fn(&BuildArgs) -> Result<Instance, FactoryError>,
}

inventory::collect!(ClassSubmission);

/// Submit a class definition for link-time discovery.
///
/// ```ignore
/// submit_class! {
///     library: "sinks",
///     name: "FileSink",
///     label: "rotating",          // optional
///     construct: build_file_sink, // fn(&BuildArgs) -> Result<Instance, FactoryError>
/// }
/// ```
#[macro_export]
macro_rules! submit_class {
    (library: $library:expr, name: $name:expr, construct: $construct:expr $(,)?) => {
        $crate::inventory::submit! {
            $crate::ClassSubmission {
                library: $library,
                name: $name,
                label: None,
                construct: $construct,
            }
        }
    };
    (library: $library:expr, name: $name:expr, label: $label:expr, construct: $construct:expr $(,)?) => {
        $crate::inventory::submit! {
            $crate::ClassSubmission {
                library: $library,
                name: $name,
                label: Some($label),
                construct: $construct,
            }
        }
    };
}

// ─── Linked catalog ───────────────────────────────────────────────────────────

/// A [`ClassCatalog`] over the link-time submissions of one library.
pub struct LinkedCatalog {
    library: String,
}

impl LinkedCatalog {
    /// The catalog of submissions whose `library` matches.
    pub fn new(library: impl Into<String>) -> Self {
        Self {
            library: library.into(),
        }
    }

    /// Every distinct library seen at link time, sorted.
    pub fn libraries() -> Vec<&'static str> {
        let mut libraries: Vec<&'static str> = inventory::iter::<ClassSubmission>
            .into_iter()
            .map(|submission| submission.library)
            .collect();
        libraries.sort_unstable();
        libraries.dedup();
        libraries
    }
}

impl ClassCatalog for LinkedCatalog {
    fn library(&self) -> &str {
        &self.library
    }

    /// Enumeration over linked submissions cannot fail: nothing is imported
    /// or parsed at fill time.
    fn entries(&self) -> Result<Vec<CatalogEntry>, FactoryError> {
        Ok(inventory::iter::<ClassSubmission>
            .into_iter()
            .filter(|submission| submission.library == self.library)
            .map(|submission| {
                let entry =
                    CatalogEntry::new(submission.name, ClassDef::from_fn(submission.construct));
                match submission.label {
                    Some(label) => entry.label(label),
                    None => entry,
                }
            })
            .collect())
    }
}

/// Bulk-populate a registry from every linked submission, across all
/// libraries; returns the number of entries registered.
pub fn populate(registry: &MemoryClassRegistry) -> Result<usize, FactoryError> {
    let mut count = 0;
    for library in LinkedCatalog::libraries() {
        count += registry.fill_from(&LinkedCatalog::new(library))?;
    }
    tracing::debug!(count, "registry populated from linked submissions");
    Ok(count)
}

// ─── Tests ────────────────────────────────────────────────────────────────────
