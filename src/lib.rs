//! # Component extension for Svelte single-file components
//!
//! A component can declare that it extends another one:
//!
//! ```html
//! <extend from="./Base.svelte" html="after" />
//! <p>extra markup</p>
//! ```
//!
//! The pipeline resolves the chain of `<extend>` directives back to the
//! outermost base, folds it into one component and renders it as source text.
//!
//! ## Merge Rules
//!
//! 1. **Markup** is replaced by the extending component unless the directive
//!    carries `html` (or `html="before"`/`html="after"`).
//! 2. **Scripts** (instance and `context="module"`) are replaced when the
//!    extending component has its own, or merged declaration by declaration
//!    when its tag carries `extend`.
//! 3. **Styles** are replaced, or concatenated in the position given by
//!    `extend`/`extend="before"`.
//! 4. Relative `src`, `url()`, `import` and `require` references inherited
//!    from a base are rewritten to resolve from the extending component.
//!
//! A source without a usable directive is returned untouched.

mod attributes;
mod component;
mod directive;
mod discovery;
mod error;
mod js_merge;
mod loader;
mod merge;
mod options;
mod paths;
mod pipeline;
mod resolve;
mod scan;

#[cfg(feature = "napi")]
mod bindings;


pub use attributes::{parse_attributes, AttrValue, Attributes};
pub use component::{ComponentModel, Segment};
pub use directive::{find_extend_tag, ExtendDirective, Extension};
pub use discovery::{discover_components, DiscoveredComponent};
pub use error::{ExtendError, Result};
pub use js_merge::{merge_code, merge_code_with, source_type_for_lang};
pub use loader::{FileLoader, FsLoader, MemoryLoader};
pub use merge::{combine, generate, MergePosition};
pub use options::{ExtendOptions, FileFilter};
pub use pipeline::{extend, Extender};
pub use resolve::ChainResolver;
pub use scan::{scan, ScanResult, ScannedBlock, Tag, TagName};

#[cfg(feature = "napi")]
pub use bindings::{
    discover_components_native, extend_native, merge_code_native, process_native,
};
