pub mod percentage;
pub use percentage::{
    allocated_percentage, available_capacity, derive_generator_status, round2, suggested_percentage,
};
pub mod transition;
pub use transition::{Step, Transition, TransitionPlan};
pub mod warning;
pub use warning::{allocation_warnings, AllocationWarning};
