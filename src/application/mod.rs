pub mod use_cases;

pub use use_cases::push_dataset::{prepare, PreparedPush, PushDatasetUseCase, PushPlan};
