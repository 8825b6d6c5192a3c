pub mod mongo_context;
pub mod readiness;
