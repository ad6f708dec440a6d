//! Client for a remote task-tracking service that exposes its state as
//! semi-structured text. Listings in two grammars are parsed into a flat
//! task forest, merged across pages, and composed into a grouped, sorted,
//! filtered display tree with selection and drag-drop edit classification.

pub mod api;
pub mod board;
pub mod cli;
pub mod io;
pub mod model;
pub mod ops;
pub mod parse;
