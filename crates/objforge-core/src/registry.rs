//! The class registry — maps compound keys to constructible definitions.
//!
//! Resolution rule for `create`:
//! 1. Filter entries by case-insensitive name.
//! 2. If the selector carries a `library`, require an exact library match.
//! 3. If the selector carries a `label`, require an exact label match.
//! 4. Zero survivors → `NotFound`; more than one → `Ambiguous`;
//!    exactly one → invoke its constructor.

use std::collections::HashMap;
use std::sync::RwLock;

use crate::error::FactoryError;
use crate::types::{BuildArgs, ClassDef, EntryKey, Instance, RegistryEntry, Selector};

/// Trait for looking up registered class definitions.
///
/// The read side of the registry; population happens through
/// [`MemoryClassRegistry`] directly.
pub trait ClassRegistry: Send + Sync {
    /// All entries whose compound key satisfies the selector.
    /// Returns multiple entries when the selector is ambiguous.
    fn matches(&self, selector: &Selector) -> Vec<RegistryEntry>;

    /// Returns `true` if any entry is registered under `name`
    /// (case-insensitive, regardless of qualifiers).
    fn contains(&self, name: &str) -> bool;

    /// Total number of registered entries.
    fn len(&self) -> usize;

    /// Returns `true` if the registry is empty.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// ─── Registration ─────────────────────────────────────────────────────────────

/// Input to [`MemoryClassRegistry::register`]: a name, a definition, and
/// optional qualifiers.
#[derive(Debug, Clone)]
pub struct Registration {
    /// Primary lookup name. Lowercased on insertion.
    pub name: String,
    /// The constructible definition.
    pub class_def: ClassDef,
    /// Optional library qualifier (the originating namespace).
    pub library: Option<String>,
    /// Optional label qualifier (intentional multi-registration).
    pub label: Option<String>,
    /// Provenance recorded on the entry.
    pub source: String,
}

impl Registration {
    /// A manual registration under `name`.
    pub fn new(name: impl Into<String>, class_def: ClassDef) -> Self {
        Self {
            name: name.into(),
            class_def,
            library: None,
            label: None,
            source: "manual".into(),
        }
    }

    /// Qualify the registration with a library.
    pub fn library(mut self, library: impl Into<String>) -> Self {
        self.library = Some(library.into());
        self
    }

    /// Qualify the registration with a label.
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Override the recorded provenance.
    pub fn source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }
}

// ─── In-memory registry ───────────────────────────────────────────────────────

/// The in-memory registry backed by `HashMap`, guarded by a reader-writer
/// lock: concurrent `create`/`matches` share the read lock, `register` takes
/// the write lock. Last write wins for an identical compound key — that
/// overwrite is the supported mechanism for substituting an alternative
/// implementation under an existing key.
pub struct MemoryClassRegistry {
    entries: RwLock<HashMap<EntryKey, RegistryEntry>>,
}

impl MemoryClassRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Register a class definition.
    ///
    /// Fails with [`FactoryError::Validation`] on an empty or blank name,
    /// leaving the mapping untouched. An existing entry at the same compound
    /// key is replaced.
    pub fn register(&self, registration: Registration) -> Result<(), FactoryError> {
        if registration.name.trim().is_empty() {
            return Err(FactoryError::Validation {
                reason: "registration name must be non-empty".into(),
            });
        }

        let key = EntryKey::new(
            &registration.name,
            registration.library.as_deref(),
            registration.label.as_deref(),
        );
        let entry = RegistryEntry {
            key: key.clone(),
            class_def: registration.class_def,
            source: registration.source,
        };

        let mut entries = self.entries.write().unwrap();
        if let Some(prev) = entries.insert(key.clone(), entry) {
            tracing::debug!(
                name = key.name(),
                prev_source = %prev.source,
                "replaced existing registration"
            );
        }
        Ok(())
    }

    /// Resolve a selector to exactly one entry.
    ///
    /// A qualifier that matches nothing yields [`FactoryError::NotFound`],
    /// the same as an unregistered name.
    pub fn resolve(&self, selector: &Selector) -> Result<RegistryEntry, FactoryError> {
        let mut found = self.matches(selector);
        match found.len() {
            0 => Err(FactoryError::NotFound {
                selector: selector.to_string(),
            }),
            1 => Ok(found.remove(0)),
            count => Err(FactoryError::Ambiguous {
                selector: selector.to_string(),
                count,
            }),
        }
    }

    /// Resolve a selector and invoke the matching definition's constructor.
    ///
    /// Every call constructs a fresh instance; the registry stores
    /// definitions, not objects.
    pub fn create(&self, selector: &Selector, args: &BuildArgs) -> Result<Instance, FactoryError> {
        let entry = self.resolve(selector)?;
        entry.class_def.construct(args)
    }

    /// [`create`](Self::create), downcast to a concrete type.
    pub fn create_as<T: Send + Sync + 'static>(
        &self,
        selector: &Selector,
        args: &BuildArgs,
    ) -> Result<T, FactoryError> {
        let instance = self.create(selector, args)?;
        instance
            .downcast::<T>()
            .map(|boxed| *boxed)
            .map_err(|_| FactoryError::Downcast {
                name: selector.name.clone(),
                expected: std::any::type_name::<T>(),
            })
    }
}

impl Default for MemoryClassRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ClassRegistry for MemoryClassRegistry {
    fn matches(&self, selector: &Selector) -> Vec<RegistryEntry> {
        let name = selector.name.to_lowercase();
        self.entries
            .read()
            .unwrap()
            .values()
            .filter(|entry| {
                entry.key.name() == name
                    && selector
                        .library
                        .as_deref()
                        .map_or(true, |lib| entry.key.library() == Some(lib))
                    && selector
                        .label
                        .as_deref()
                        .map_or(true, |label| entry.key.label() == Some(label))
            })
            .cloned()
            .collect()
    }

    fn contains(&self, name: &str) -> bool {
        let name = name.to_lowercase();
        self.entries
            .read()
            .unwrap()
            .keys()
            .any(|key| key.name() == name)
    }

    fn len(&self) -> usize {
        self.entries.read().unwrap().len()
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Buildable;

    #[derive(Debug, PartialEq)]
    struct PrintWriter {
        target: String,
    }

    impl Buildable for PrintWriter {
        fn build(args: &BuildArgs) -> Result<Self, FactoryError> {
            let target = args
                .get("target")
                .and_then(|v| v.as_str())
                .unwrap_or("stdout")
                .to_string();
            Ok(Self { target })
        }
    }

    #[derive(Debug)]
    struct DbWriter;

    impl Buildable for DbWriter {
        fn build(_args: &BuildArgs) -> Result<Self, FactoryError> {
            Ok(Self)
        }
    }

    #[derive(Debug)]
    struct Foo;

    impl Buildable for Foo {
        fn build(_args: &BuildArgs) -> Result<Self, FactoryError> {
            Ok(Self)
        }
    }

    #[derive(Debug)]
    struct Baz;

    impl Buildable for Baz {
        fn build(_args: &BuildArgs) -> Result<Self, FactoryError> {
            Ok(Self)
        }
    }

    fn no_args() -> BuildArgs {
        BuildArgs::new()
    }

    #[test]
    fn register_and_create() {
        let reg = MemoryClassRegistry::new();
        reg.register(Registration::new("writer", ClassDef::of::<PrintWriter>()))
            .unwrap();

        let mut args = BuildArgs::new();
        args.insert("target".into(), "file".into());
        let writer: PrintWriter = reg.create_as(&Selector::new("writer"), &args).unwrap();
        assert_eq!(writer.target, "file");
    }

    #[test]
    fn lookup_is_case_insensitive() {
        let reg = MemoryClassRegistry::new();
        reg.register(Registration::new("Writer", ClassDef::of::<PrintWriter>()))
            .unwrap();

        assert!(reg.contains("wRiTeR"));
        let writer: PrintWriter = reg.create_as(&Selector::new("WRITER"), &no_args()).unwrap();
        assert_eq!(writer.target, "stdout");
    }

    #[test]
    fn overwrite_replaces_prior_definition() {
        let reg = MemoryClassRegistry::new();
        reg.register(Registration::new("writer", ClassDef::of::<PrintWriter>()))
            .unwrap();
        reg.register(Registration::new("writer", ClassDef::of::<DbWriter>()))
            .unwrap();

        assert_eq!(reg.len(), 1);
        let instance = reg.create(&Selector::new("writer"), &no_args()).unwrap();
        assert!(instance.downcast::<DbWriter>().is_ok());
    }

    #[test]
    fn unknown_key_is_not_found() {
        let reg = MemoryClassRegistry::new();
        let err = reg.resolve(&Selector::new("unknown")).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn wrong_qualifier_is_not_found() {
        let reg = MemoryClassRegistry::new();
        reg.register(
            Registration::new("bob", ClassDef::of::<Foo>()).library("pkg1"),
        )
        .unwrap();

        let err = reg
            .resolve(&Selector::new("bob").library("some_package"))
            .unwrap_err();
        assert!(err.is_not_found());

        let err = reg
            .resolve(&Selector::new("bob").label("some_label"))
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn library_disambiguates_shared_name() {
        let reg = MemoryClassRegistry::new();
        reg.register(Registration::new("bob", ClassDef::of::<Foo>()).library("pkg1"))
            .unwrap();
        reg.register(Registration::new("bob", ClassDef::of::<Baz>()).library("pkg2"))
            .unwrap();

        let err = reg.resolve(&Selector::new("bob")).unwrap_err();
        assert!(err.is_ambiguous());

        let foo = reg
            .create(&Selector::new("bob").library("pkg1"), &no_args())
            .unwrap();
        assert!(foo.downcast::<Foo>().is_ok());

        let baz = reg
            .create(&Selector::new("bob").library("pkg2"), &no_args())
            .unwrap();
        assert!(baz.downcast::<Baz>().is_ok());
    }

    #[test]
    fn label_disambiguates_shared_name() {
        let reg = MemoryClassRegistry::new();
        reg.register(
            Registration::new("writer", ClassDef::of::<PrintWriter>()).label("print_writer"),
        )
        .unwrap();
        reg.register(Registration::new("writer", ClassDef::of::<DbWriter>()).label("db_writer"))
            .unwrap();

        let writer: PrintWriter = reg
            .create_as(&Selector::new("writer").label("print_writer"), &no_args())
            .unwrap();
        assert_eq!(writer.target, "stdout");

        let err = reg.resolve(&Selector::new("writer")).unwrap_err();
        assert!(err.is_ambiguous());

        let err = reg.resolve(&Selector::new("unknown")).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn empty_name_fails_validation() {
        let reg = MemoryClassRegistry::new();
        let err = reg
            .register(Registration::new("", ClassDef::of::<Foo>()))
            .unwrap_err();
        assert!(matches!(err, FactoryError::Validation { .. }));
        assert!(reg.is_empty());

        let err = reg
            .register(Registration::new("   ", ClassDef::of::<Foo>()))
            .unwrap_err();
        assert!(matches!(err, FactoryError::Validation { .. }));
        assert!(reg.is_empty());
    }

    #[test]
    fn constructor_failure_propagates() {
        #[derive(Debug)]
        struct Failing;
        impl Buildable for Failing {
            fn build(_args: &BuildArgs) -> Result<Self, FactoryError> {
                Err(FactoryError::Construction {
                    name: "failing".into(),
                    reason: "missing required argument".into(),
                })
            }
        }

        let reg = MemoryClassRegistry::new();
        reg.register(Registration::new("failing", ClassDef::of::<Failing>()))
            .unwrap();

        let err = reg
            .create_as::<Failing>(&Selector::new("failing"), &no_args())
            .unwrap_err();
        assert!(matches!(err, FactoryError::Construction { .. }));
    }

    #[test]
    fn downcast_mismatch_is_reported() {
        let reg = MemoryClassRegistry::new();
        reg.register(Registration::new("writer", ClassDef::of::<PrintWriter>()))
            .unwrap();

        let err = reg
            .create_as::<DbWriter>(&Selector::new("writer"), &no_args())
            .unwrap_err();
        assert!(matches!(err, FactoryError::Downcast { .. }));
    }

    #[test]
    fn matches_returns_every_candidate() {
        let reg = MemoryClassRegistry::new();
        reg.register(Registration::new("writer", ClassDef::of::<PrintWriter>()).library("pkg1"))
            .unwrap();
        reg.register(Registration::new("writer", ClassDef::of::<DbWriter>()).library("pkg2"))
            .unwrap();

        assert_eq!(reg.matches(&Selector::new("writer")).len(), 2);
        assert_eq!(
            reg.matches(&Selector::new("writer").library("pkg1")).len(),
            1
        );
        assert!(reg.matches(&Selector::new("reader")).is_empty());
    }
}
