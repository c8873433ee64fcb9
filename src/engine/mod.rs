// Engine modules: input bindings

pub mod input;
