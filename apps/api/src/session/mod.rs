pub mod handlers;
pub mod machine;
pub mod store;
