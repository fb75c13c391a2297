pub mod ports;
pub mod transform_use_case;

pub use transform_use_case::{OnError, TransformSummary, TransformUseCase};
