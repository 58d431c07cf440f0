pub mod crush;
pub mod invoke;
