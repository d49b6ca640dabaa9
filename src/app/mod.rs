//! Application layer: gateway events in, actions out.

pub mod action;
pub mod commands;
pub mod event;
pub mod handler;
