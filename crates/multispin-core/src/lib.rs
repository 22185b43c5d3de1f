//! # multispin-core: spinner engine
//!
//! Many named spinners drawn as one block on a terminal stream, redrawn in
//! place without flicker and without eating the scroll-back:
//!
//! - **[`layout`]**: word wrap, indentation, visible width of styled text
//! - **[`purge`]**: validation combinators for free-form option bags
//! - **[`status`]**: `StatusRegistry` with status names, aliases, attributes
//!   and optional plain-mode renderers
//! - **[`frames`]**: animation frame sets
//! - **[`options`]**: `SpinnerOptions` and `GroupConfig`
//! - **[`spinner`]**: one entry's state and rendering
//! - **[`group`]**: `SpinnerGroup` lifecycle, ticker and diffed redraw
//! - **[`error`]**: usage errors
//!
//! ```no_run
//! use multispin_core::{GroupConfig, SpinnerGroup, SpinnerOptions};
//!
//! let spinners = SpinnerGroup::new(GroupConfig::default());
//! spinners.add("build", &SpinnerOptions::new().text("Compiling")).unwrap();
//! spinners.succeed("build", &SpinnerOptions::new().text("Compiled")).unwrap();
//! ```

pub mod error;
pub mod frames;
pub mod group;
pub mod layout;
pub mod options;
pub mod purge;
pub mod spinner;
pub mod status;

pub use error::{Result, SpinnerError};
pub use frames::{Frames, FramesSpec};
pub use group::{SpinnerGroup, SpinnerHandle};
pub use options::{GroupConfig, SpinnerOptions};
pub use spinner::{ColorRoles, Rendered, Spinner, StatusOverride};
pub use status::{PlainRender, PlainRow, Prefix, StatusAttributes, StatusDefinition, StatusRegistry};
