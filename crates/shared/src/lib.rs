pub mod constants;
pub mod domain;
pub mod error;
pub mod protocol;
