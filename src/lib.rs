pub mod cli;
pub mod core;
pub mod debate;
pub mod openai;
