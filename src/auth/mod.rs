pub mod credentials;
pub mod middleware;
pub mod password;
pub mod token;
