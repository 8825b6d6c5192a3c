pub mod handlers;
pub mod serializers;
pub mod state;
