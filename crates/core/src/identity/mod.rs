mod types;

pub use types::{Domain, Role, User, UserInfo};
