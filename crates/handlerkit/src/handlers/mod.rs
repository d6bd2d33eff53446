pub mod apps;
pub mod debug;
pub mod health;
pub mod namespace;
