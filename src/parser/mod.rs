pub mod html;
pub mod types;
