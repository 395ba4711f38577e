pub mod entities;
pub mod expander;
pub mod requests;
pub mod responses;
