//! Client-side construction of WOQL queries.
//!
//! [`WoqlQuery`] assembles the JSON-LD query tree through a cursor-based
//! builder: chained calls conjoin at the cursor, sub-query operations move
//! the cursor inside themselves, and [`WoqlQuery::to_json`] serializes the
//! rolled-up tree. [`compile_path_pattern`] compiles the textual path
//! grammar (`<parent,(child|sibling)*`) into a [`PathPattern`], and
//! [`contains_update`] reports whether a serialized query mutates data.

pub mod ast;
pub mod builder;
pub mod coerce;
pub mod config;
pub mod error;
pub mod lexer;
pub mod params;
pub mod parser;
pub mod taint;
pub mod value;
pub mod vocab;

#[cfg(feature = "cli")]
pub mod cli;

pub use ast::PathPattern;
pub use builder::{Order, OrderTemplate, Subquery, WoqlQuery};
pub use coerce::{Coercer, ValueWrapper};
pub use config::WoqlConfig;
pub use error::{Result, WoqlError};
pub use lexer::tokenize;
pub use params::Operation;
pub use parser::compile_path_pattern;
pub use taint::contains_update;
pub use value::{Doc, SlotKind, Term, ToAst, Var, vars};
pub use vocab::Vocabulary;
