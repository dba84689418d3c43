mod customer_appearance_schedule;
mod instance_error;
mod problem_instance;

pub use customer_appearance_schedule::{CustomerAppearance, CustomerAppearanceSchedule};
pub use instance_error::InstanceError;
pub use problem_instance::{CustomerSpec, ProblemInstance, VehicleSpec};
