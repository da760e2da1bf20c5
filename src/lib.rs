//MIT License
#![allow(non_camel_case_types)]
#![allow(non_snake_case)]
pub mod Utils;
pub mod expression;
pub mod numerical;
pub mod somelinalg;
