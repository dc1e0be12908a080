//! Platter client: backend services, session storage and view controllers.

pub mod context;
pub mod errors;
pub mod http;
pub mod services;
pub mod session;
pub mod views;

#[cfg(test)]
mod test;
