//! Interprets parsed UI documents into live object graphs.
//!
//! The loader walks an attributed element tree (schema version 4.0) and
//! drives a pluggable [`Toolkit`]: the object factory plus the placement
//! and wiring operations a real widget toolkit would perform. Property
//! decoding is delegated to a [`PropertyResolver`]. The crate ships a
//! recording backend ([`GraphToolkit`]/[`GraphResolver`]) that materializes
//! a generic, inspectable object graph.

mod builder;
mod class;
mod graph;
mod props;
mod stack;
mod toolkit;

pub use builder::{Builder, Built};
pub use class::{ClassMap, LayoutKind, ObjectKind, WidgetKind};
pub use graph::{
    ActionEntry, ComboItem, GraphNode, GraphResolver, GraphToolkit, ObjectId, PlacedKind,
    Placement, SpacerInfo,
};
pub use props::{
    CONTENTS_MARGINS_PROP, DelayedProp, MARGIN_PROP, PropertyResolver, SPACING_PROP, has_property,
};
pub use stack::{Placed, PlacementStack};
pub use toolkit::{
    FormRole, GridPos, HeaderProp, HeaderSide, ItemAt, ItemField, LayoutChild, LayoutIndexProp,
    Toolkit,
};

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("unsupported ui document version {0:?} (only 4.0 is supported)")]
    UnsupportedVersion(String),
    #[error("no such widget class {0:?}")]
    NoSuchWidget(String),
    #[error("custom widget header {0:?} may not contain '..'")]
    InvalidHeaderPath(String),
    #[error("no object named {0:?} in this document")]
    UnknownObject(String),
    #[error("malformed document: {0}")]
    Document(String),
    #[error("toolkit: {0}")]
    Toolkit(String),
}
