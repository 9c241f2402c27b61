pub mod engine;
pub mod goal;
pub mod outcome;

pub use engine::compute_commission;
pub use goal::{effective_goal, percentage_of_goal, GoalStatus, REFERENCE_MONTH_DAYS};
pub use outcome::CommissionOutcome;
