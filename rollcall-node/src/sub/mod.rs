use super::*;

pub mod run;
pub mod submit;
