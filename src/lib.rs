//! Browse the catalogue of clustering methods for categorical sequences.
//!
//! The [`sankey`] module turns a filtered set of [`MethodRecord`]s into a
//! data type → method family → subfamily flow diagram; the rest is the
//! loading, filtering and card formatting around it.
//!
//! [`MethodRecord`]: data::model::MethodRecord

pub mod card;
pub mod color;
pub mod config;
pub mod data;
pub mod sankey;
pub mod state;
