//! Image storage adapters

mod local;

pub use local::LocalImageStore;
