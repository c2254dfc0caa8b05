mod details;
mod panels;
mod search;
pub(in crate::app) mod toasts;
