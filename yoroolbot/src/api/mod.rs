pub mod keyboard;
pub mod markdown;
