mod danger_level;
mod operation_type;

pub use danger_level::DangerLevel;
pub use operation_type::OperationType;
