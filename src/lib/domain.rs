//! Domain logic

pub mod communication;
