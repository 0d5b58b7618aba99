pub mod replicate_test;
pub mod utils_test;
