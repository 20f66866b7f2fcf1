//! solar-assist: rooftop solar assessment through a hosted vision model, with Hexagonal Architecture.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod shared;
pub mod usecases;
