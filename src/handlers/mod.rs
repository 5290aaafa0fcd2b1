pub mod account;
pub mod market;
pub mod session;

pub use account::*;
pub use market::*;
pub use session::*;

pub async fn health() -> &'static str {
    "OK"
}
