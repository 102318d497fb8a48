use wasm_bindgen::prelude::*;

pub mod adaptive;
mod bindings;
pub mod session;
mod utils;

pub use bindings::{AbrEngine, JsAbrSession, LogLevel};
pub use utils::logger::{Logger, LoggerLevel};
