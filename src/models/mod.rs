//! Domain models for the PCF workbench.
//!
//! # Work Items
//!
//! Work items are the JSON interchange format passed between tools. They form a
//! strict three-level hierarchy:
//!
//! - [`Epic`]: A large body of work, containing user stories.
//! - [`UserStory`]: A user-facing capability, containing tasks.
//! - [`Task`]: A unit of implementation work with a [`TaskStatus`].
//!
//! A [`Document`] wraps the epics with [`DocumentMetadata`] describing where and
//! when they were produced. Documents are written once and read back by
//! downstream tools; nothing mutates them in place.

mod work_item;

pub use work_item::*;
