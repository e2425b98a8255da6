//! Speech provider implementations

pub mod dashscope;
