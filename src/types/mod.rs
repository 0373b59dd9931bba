pub mod forecast;
pub mod history;
pub mod holiday;
pub mod model_info;
pub mod resource_state;
pub mod timestamp;
pub mod weather;
