pub mod handlers;
pub mod identity;
pub mod merge;
pub mod reconcile;
pub mod service;
