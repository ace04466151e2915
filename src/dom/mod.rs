//! Owned markup trees
//!
//! This module provides the in-memory representation used for everything that
//! gets cloned out of a page. It includes:
//! - Element / Node: owned element tree with ordered, unique attributes
//! - Fragment: the inner content of an element, with parsing and serialization

pub mod element;
pub mod fragment;

pub use element::{Element, Node};
pub use fragment::{Fragment, clone_element, element_to_html};
