pub mod data_type;
pub mod entity;
pub mod errors;
pub mod value;
