pub mod portrait_controller;
pub mod replicate;
