//! Core types for the ObjForge registry: definitions, compound keys, selectors.

use serde::{Deserialize, Serialize};
use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::error::FactoryError;

// ─── Construction arguments ───────────────────────────────────────────────────

/// Named construction arguments passed to a [`ClassDef`].
///
/// The keyword-argument analog: a JSON object mapping argument names to
/// values. Constructors pick out the fields they understand and fall back to
/// defaults for the rest.
pub type BuildArgs = serde_json::Map<String, serde_json::Value>;

/// A constructed object, type-erased.
///
/// Callers either downcast it themselves or go through
/// [`MemoryClassRegistry::create_as`](crate::registry::MemoryClassRegistry::create_as).
pub type Instance = Box<dyn Any + Send + Sync>;

// ─── Buildable ────────────────────────────────────────────────────────────────

/// The capability every registered type must provide: construction from
/// [`BuildArgs`].
///
/// This is the registry's only requirement on registered types. What the
/// constructed instance can *do* is between it and the eventual caller.
pub trait Buildable: Send + Sync + Sized + 'static {
    /// Construct an instance from named arguments.
    fn build(args: &BuildArgs) -> Result<Self, FactoryError>;
}

// ─── ClassDef ─────────────────────────────────────────────────────────────────

/// A constructible class definition — the value side of a registry entry.
///
/// Cheap to clone; the underlying constructor is shared.
#[derive(Clone)]
pub struct ClassDef(Arc<dyn Fn(&BuildArgs) -> Result<Instance, FactoryError> + Send + Sync>);

impl ClassDef {
    /// Wrap an arbitrary factory closure.
    pub fn from_fn<F>(f: F) -> Self
    where
        F: Fn(&BuildArgs) -> Result<Instance, FactoryError> + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    /// Adapt a [`Buildable`] type.
    pub fn of<T: Buildable>() -> Self {
        Self(Arc::new(|args| T::build(args).map(|v| Box::new(v) as Instance)))
    }

    /// Invoke the constructor with the supplied arguments.
    pub fn construct(&self, args: &BuildArgs) -> Result<Instance, FactoryError> {
        (self.0)(args)
    }
}

impl fmt::Debug for ClassDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ClassDef(<constructor>)")
    }
}

// ─── EntryKey ─────────────────────────────────────────────────────────────────

/// The compound key addressing a registry entry: `(name, library, label)`.
///
/// `name` is lowercased on construction so lookups are case-insensitive.
/// `library` and `label` are optional qualifiers; `None` means unspecified.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntryKey {
    name: String,
    library: Option<String>,
    label: Option<String>,
}

impl EntryKey {
    /// Build a compound key, normalizing the name.
    pub fn new(name: &str, library: Option<&str>, label: Option<&str>) -> Self {
        Self {
            name: name.to_lowercase(),
            library: library.map(str::to_string),
            label: label.map(str::to_string),
        }
    }

    /// The case-normalized primary name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The originating library, if qualified.
    pub fn library(&self) -> Option<&str> {
        self.library.as_deref()
    }

    /// The registration label, if qualified.
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }
}

// ─── RegistryEntry ────────────────────────────────────────────────────────────

/// A live registry entry: the compound key, the definition bound to it, and
/// where the registration came from (`"manual"`, or the catalog's library).
#[derive(Debug, Clone)]
pub struct RegistryEntry {
    /// The compound key this entry is addressed by.
    pub key: EntryKey,
    /// The constructible definition.
    pub class_def: ClassDef,
    /// Provenance of the registration.
    pub source: String,
}

// ─── Selector ─────────────────────────────────────────────────────────────────

/// A lookup query: the primary name plus optional qualifiers to narrow a
/// match when several entries share the name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selector {
    /// Primary name, matched case-insensitively.
    pub name: String,
    /// Exact-match library filter.
    pub library: Option<String>,
    /// Exact-match label filter.
    pub label: Option<String>,
}

impl Selector {
    /// Select by name alone.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            library: None,
            label: None,
        }
    }

    /// Narrow the lookup to one library.
    pub fn library(mut self, library: impl Into<String>) -> Self {
        self.library = Some(library.into());
        self
    }

    /// Narrow the lookup to one label.
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        match (&self.library, &self.label) {
            (Some(lib), Some(label)) => write!(f, " (library {lib}, label {label})"),
            (Some(lib), None) => write!(f, " (library {lib})"),
            (None, Some(label)) => write!(f, " (label {label})"),
            (None, None) => Ok(()),
        }
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entry_key_normalizes_name() {
        let key = EntryKey::new("PrintWriter", Some("pkg1"), None);
        assert_eq!(key.name(), "printwriter");
        assert_eq!(key.library(), Some("pkg1"));
        assert_eq!(key.label(), None);
    }

    #[test]
    fn entry_keys_differ_by_qualifier() {
        let a = EntryKey::new("writer", Some("pkg1"), None);
        let b = EntryKey::new("writer", Some("pkg2"), None);
        let c = EntryKey::new("writer", Some("pkg1"), Some("fast"));
        assert_ne!(a, b);
        assert_ne!(a, c);
        assert_eq!(a, EntryKey::new("WRITER", Some("pkg1"), None));
    }

    #[test]
    fn selector_display() {
        assert_eq!(Selector::new("writer").to_string(), "writer");
        assert_eq!(
            Selector::new("writer").library("pkg1").to_string(),
            "writer (library pkg1)"
        );
        assert_eq!(
            Selector::new("writer").label("fast").to_string(),
            "writer (label fast)"
        );
        assert_eq!(
            Selector::new("writer").library("pkg1").label("fast").to_string(),
            "writer (library pkg1, label fast)"
        );
    }

    #[test]
    fn class_def_of_buildable() {
        struct Fixed(u64);
        impl Buildable for Fixed {
            fn build(args: &BuildArgs) -> Result<Self, FactoryError> {
                let n = args.get("n").and_then(|v| v.as_u64()).unwrap_or(7);
                Ok(Self(n))
            }
        }

        let def = ClassDef::of::<Fixed>();
        let instance = def.construct(&BuildArgs::new()).unwrap();
        let fixed = instance.downcast::<Fixed>().unwrap();
        assert_eq!(fixed.0, 7);

        let mut args = BuildArgs::new();
        args.insert("n".into(), 42u64.into());
        let fixed = def.construct(&args).unwrap().downcast::<Fixed>().unwrap();
        assert_eq!(fixed.0, 42);
    }
}
