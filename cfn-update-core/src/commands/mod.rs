//! Commands module - service layer for cfn-update operations

mod apply;
mod plan;
pub(crate) mod service;

pub use plan::build_update_plan;
pub use service::StackUpdateService;
