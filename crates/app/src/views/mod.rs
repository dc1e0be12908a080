//! View controllers.
//!
//! Each controller owns the state one screen needs and turns service
//! results into either data or a [`Notice`](crate::errors::Notice).

pub mod auth;
pub mod browser;
pub mod cart;
pub mod checkout;
pub mod delivery;
pub mod lifetime;
pub mod orders;
pub mod owner;
pub mod reviews;

pub use auth::*;
pub use browser::*;
pub use cart::*;
pub use checkout::*;
pub use delivery::*;
pub use lifetime::*;
pub use orders::*;
pub use owner::*;
pub use reviews::*;
