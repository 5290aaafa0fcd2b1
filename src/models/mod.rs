mod billing;
mod forms;
mod market;
mod session;
mod stock;
mod watchlist;

pub use billing::*;
pub use forms::*;
pub use market::*;
pub use session::*;
pub use stock::*;
pub use watchlist::*;
