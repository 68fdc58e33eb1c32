pub mod health;
pub mod model_status;
pub mod prediction;
pub mod training;
pub mod upload;
