//! Output data models

pub mod readable;

pub use readable::ReadableRecord;
