//! objforge-core — a keyed class-definition registry.
//!
//! Maps string keys (optionally qualified by a library and/or a label) to
//! constructible class definitions and instantiates objects on demand — an
//! in-process service locator without the hand-written factory classes.
//!
//! # Architecture
//!
//! ```text
//! MemoryClassRegistry   (RwLock<HashMap<EntryKey, RegistryEntry>>)
//!        ├── register        one-off / override registration
//!        ├── fill_from       bulk-populate from a ClassCatalog
//!        ├── create          resolve a Selector, invoke the ClassDef
//!        └── matches/contains read-only existence checks
//! ```
//!
//! # Quick Start
//!
//! ```rust
//! use objforge_core::{
//!     BuildArgs, Buildable, ClassDef, FactoryError, MemoryClassRegistry, Registration, Selector,
//! };
//!
//! struct Greeter {
//!     greeting: String,
//! }
//!
//! impl Buildable for Greeter {
//!     fn build(args: &BuildArgs) -> Result<Self, FactoryError> {
//!         let greeting = args
//!             .get("greeting")
//!             .and_then(|v| v.as_str())
//!             .unwrap_or("hello")
//!             .to_string();
//!         Ok(Self { greeting })
//!     }
//! }
//!
//! let registry = MemoryClassRegistry::new();
//! registry
//!     .register(Registration::new("greeter", ClassDef::of::<Greeter>()))
//!     .unwrap();
//!
//! let greeter: Greeter = registry
//!     .create_as(&Selector::new("greeter"), &BuildArgs::new())
//!     .unwrap();
//! assert_eq!(greeter.greeting, "hello");
//! ```

pub mod catalog;
pub mod error;
pub mod registry;
pub mod types;

pub use catalog::{CatalogEntry, ClassCatalog, StaticCatalog};
pub use error::FactoryError;
pub use registry::{ClassRegistry, MemoryClassRegistry, Registration};
pub use types::{BuildArgs, Buildable, ClassDef, EntryKey, Instance, RegistryEntry, Selector};
