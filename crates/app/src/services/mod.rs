//! Backend services, one per area of the API.

pub mod auth;
pub mod cart;
pub mod delivery;
pub mod orders;
pub mod owner;
pub mod restaurants;
pub mod reviews;

pub use auth::*;
pub use cart::*;
pub use delivery::*;
pub use orders::*;
pub use owner::*;
pub use restaurants::*;
pub use reviews::*;
