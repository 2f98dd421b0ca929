pub mod string;
pub mod validate;
