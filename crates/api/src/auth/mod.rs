pub mod config;
pub mod jwt;
pub mod middleware;
pub mod password;
pub mod permissions;

pub use config::AuthConfig;
pub use jwt::{Claims, JwtService};
pub use middleware::AuthMiddleware;
pub use password::PasswordService;
pub use permissions::{Actor, Role};
