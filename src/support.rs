//! Domain-neutral building blocks shared by the models.

pub mod constraint;
pub mod interval;
