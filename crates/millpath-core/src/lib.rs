//! # Millpath Core
//!
//! Core types, errors and shared numerics for Millpath.
//! Provides the leaf layer every other crate builds on:
//!
//! - **Types**: `Point2`, `Point3` and the `Pass` record handed to post-processors
//! - **Errors**: the hard-error taxonomy (`NumericError`)
//! - **Linear algebra**: dense matrix/vector primitives with pivoted inversion
//! - **Root finding**: Newton-Raphson with an explicit convergence flag

pub mod constants;
pub mod error;
pub mod linalg;
pub mod roots;
pub mod types;

pub use error::{NumericError, Result};
pub use linalg::Matrix;
pub use roots::{NewtonOptions, NewtonResult};
pub use types::{Pass, PassMetadata, PassStrategy, Point2, Point3};
