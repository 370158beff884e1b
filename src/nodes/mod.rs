//! Stock node implementations for common gateway wiring.

mod headers;
mod method_select;
#[cfg(test)]
mod method_select_test;
mod recover;
mod replicate;
mod respond;
#[cfg(test)]
mod respond_test;
mod round_robin;

pub use headers::{SetRequestHeader, SetResponseHeader};
pub use method_select::MethodSelect;
pub use recover::{CatchStatus, ErrorResponder, PathRewrite};
pub use replicate::Tee;
pub use respond::StaticResponder;
pub use round_robin::RoundRobin;
