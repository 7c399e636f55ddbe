pub mod reconcile;
pub mod set_operation;
pub mod spotify;
