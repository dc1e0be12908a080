//! Platter
//!
//! Domain model of the Platter food-ordering client: display records, the
//! server-owned cart snapshot, the order status lifecycle, the checkout
//! state machine and the search contract. Nothing in this crate performs
//! I/O.

pub mod auth;
pub mod busy;
pub mod cart;
pub mod cart_count;
pub mod checkout;
pub mod delivery;
pub mod forms;
pub mod ids;
pub mod money;
pub mod orders;
pub mod owner;
pub mod restaurants;
pub mod reviews;
pub mod routes;
pub mod search;

mod wire;
