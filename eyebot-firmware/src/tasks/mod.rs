//! Embassy async tasks

pub mod demo;
pub mod timebase;

pub use demo::demo_task;
pub use timebase::timebase_task;
