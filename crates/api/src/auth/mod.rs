//! Token validation for requests arriving with a bearer token.
//!
//! The platform does not mint identities itself: the external identity
//! provider runs the login flow and issues the tokens this module
//! validates.

pub mod jwt;
