pub mod controller;
pub mod loop_worker;
pub mod processor;

pub use controller::DialController;
pub use processor::DialEngine;
