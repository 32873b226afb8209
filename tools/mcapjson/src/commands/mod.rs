pub mod convert;
pub mod idl;
pub mod topics;
