//! Infrastructure implementations of the domain seams

pub mod email;
