//! Layered discovery and merge of pod configuration files.
//!
//! Podfig scans a set of registered base directories for config files named
//! after their item type (`pods.json`, `pods/fields.yml`, ...), decodes them,
//! and merges every record into one in-memory store. Directories registered
//! later override earlier ones, so a site can ship defaults and let a theme
//! or plugin directory replace individual items.
//!
//! ```ignore
//! let mut podfig = Podfig::builder()
//!     .path("/srv/site")
//!     .path("/srv/theme")
//!     .build();
//! let summary = podfig.load();
//!
//! let book = podfig.pod("post_type", "book");
//! ```
//!
//! # Vocabulary
//!
//! - **Pod**: a content-type definition identified by `(type, name)`.
//! - **Field**: an attribute of a pod, declared inline on the pod or in its
//!   own `fields` section with a `pod: {type, name}` back-reference.
//! - **Templates, pages, helpers**: flat items identified by `name`.
//! - **Custom items**: any other item type, also identified by `name`, run
//!   through preprocess hooks first.
//!
//! # Discovery
//!
//! Three registries drive a pass: base directories, formats, and item types.
//! Each is an insertion-ordered set of normalized keys. Every
//! `(format, item type)` pair yields two candidate paths under each
//! directory:
//!
//! ```text
//! <dir>/<item_type>.<format>          only `pods` on root-type directories
//! <dir>/pods/<item_type>.<format>     everywhere
//! ```
//!
//! A root-type directory (see [`PathProvider`]) is a top-level location like
//! a theme root; only the nested form and the bare `pods.<format>` are probed
//! there.
//!
//! # Precedence
//!
//! ```text
//! directory order        later registered directories win
//!        ↓ then
//! item type order        in registration order, so `pods` before `fields`
//!        ↓ then
//! format order           `json` before `yml`, later formats win
//!        ↓ then
//! bare before nested     `pods/x.json` wins over `x.json`
//! ```
//!
//! Every collision replaces the earlier record entirely. Records are not
//! deep-merged.
//!
//! # Restrictions
//!
//! A file discovered as item type `T` may only declare a `T` section, except
//! `pods` files which may declare any section. Anything else in the file is
//! ignored.
//!
//! # Failure is soft
//!
//! A pass always completes. Missing, unreadable, empty, malformed, and
//! non-mapping files are skipped, as are records missing their identifiers.
//! The returned [`LoadSummary`] lists what was loaded and what was skipped
//! and why. Only [`Settings`] loading returns [`PodfigError`].
//!
//! # Hooks
//!
//! [`Hooks`] are plain listener lists called synchronously during a pass:
//! pre-load (mutate the registries), format parsers for formats without a
//! built-in decoder, preprocess for custom items, and post-load with the
//! summary. [`parse_toml`] is a ready-made parser for `toml` files.
//!
//! # Provenance
//!
//! After a pass, [`Provenance`] maps each loaded file to the last item it
//! contributed per item type, for tools that sync the store back to an
//! authoritative database.

pub mod error;
pub mod types;

mod access;
mod builder;
pub mod format;
mod hooks;
mod load;
mod normalize;
mod paths;
mod pattern;
mod provenance;
mod register;
mod registry;
mod settings;
mod store;

#[cfg(test)]
mod fixtures;

pub use access::{FileAccess, StdFileAccess};
pub use builder::{Podfig, PodfigBuilder};
pub use error::PodfigError;
pub use format::{FormatParser, parse_toml};
pub use hooks::{Hooks, PostLoadHook, PreLoadHook, PreprocessHook};
pub use load::{Candidate, LoadSummary, SkipReason, SkippedFile, discover};
pub use normalize::{directory_key, slug};
pub use paths::{PathProvider, RootDirectories};
pub use pattern::generate_patterns;
pub use provenance::Provenance;
pub use registry::Registries;
pub use settings::Settings;
pub use store::{Pod, Store};
pub use types::{FilePattern, ItemKind, NamedKind, Record};
