#[allow(clippy::module_inception)]
pub mod report;

mod advance;
mod closure;
mod expense;
