//! Authentication module for the gatekeeper server
//!
//! This module handles password hashing, token issuance and validation,
//! and the register/login/authenticate flows.

pub mod handlers;
pub mod password;
mod service;
pub mod token;

pub use service::{AuthService, TokenResponse, UserProfile};
pub use token::{build_codec, Claims, HmacTokenCodec, IssuedToken, RsaTokenCodec, TokenCodec};
