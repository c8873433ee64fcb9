// Input binding engine: keyboard, mouse and controller input mapped onto game actions

pub mod core;
pub mod engine;
