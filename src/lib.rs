pub mod archive;
pub mod http;
pub mod install;
pub mod meta;
pub mod platform;
pub mod runtime;
