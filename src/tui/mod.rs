//! Terminal front end: state, rendering, prompts.

pub mod catalog_display;
pub mod form;
pub mod notify;
pub mod spinner;
pub mod view;
