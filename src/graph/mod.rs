//! Session graph construction and layout.
//!
//! [`build_session_graph`] turns a parsed session into presentation nodes and
//! edges with every node at the origin. A [`Layout`] then assigns positions;
//! [`LayeredLayout`] is the built-in one.

pub mod builder;
pub mod layout;

pub use builder::build_session_graph;
pub use layout::{Direction, LayeredLayout, Layout, LayoutOptions};
