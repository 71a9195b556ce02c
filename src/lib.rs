//! Core library for the grab-sheets command line application.
//!
//! The library consolidates one named worksheet out of a folder of daily
//! workbooks. IO adapters live under [`grab::sheets::io`], data
//! representations inside [`grab::sheets::model`], filename dates in
//! [`grab::sheets::codec`], file selection in [`grab::sheets::discovery`],
//! and the two consolidation strategies under [`grab::sheets::copy`] and
//! [`grab::sheets::aggregate`].

pub mod grab;

pub use grab::sheets::{
    Result, ToolError, aggregate, codec, config, copy, discovery, error, io, model, prompt,
};
