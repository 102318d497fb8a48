mod api;
mod formatters;
mod js_functions;

pub use api::*;
pub use js_functions::*;
