// Copyright 2026 the pathdeform Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Deformations of vector paths.
//!
//! The pathdeform library takes a path made of lines and cubic Bézier curves
//! and produces a new path with different geometry but a comparable visual
//! intent. Three deformers are provided:
//!
//! - [`Parallel`] draws the parallel curve at a constant normal distance,
//!   cutting away the parts that come too close to the original.
//! - [`Smoothed`] replaces the corners of a path by smooth curves.
//! - [`Cycloid`] wraps a cycloid (a "spring") around a path.
//!
//! All of them rest on [`fit_control_arms`], which finds the cubics with
//! prescribed end points, end tangents and end curvatures.
//!
//! # Examples
//!
//! Rounding the corners of a square, then drawing a parallel inside it:
//!
//! ```
//! use pathdeform::{
//!     deform_chain, Parallel, ParallelParams, Path, Point, Smoothed, SmoothedParams, Subpath,
//! };
//!
//! let square = Subpath::polyline(
//!     [
//!         Point::new(0.0, 0.0),
//!         Point::new(100.0, 0.0),
//!         Point::new(100.0, 100.0),
//!         Point::new(0.0, 100.0),
//!     ],
//!     true,
//!     1e-5,
//! );
//! let smoothed = Smoothed::new(SmoothedParams::new(20.0)).unwrap();
//! let parallel = Parallel::new(ParallelParams::new(5.0)).unwrap();
//! let result = deform_chain(&Path::from(square), &[&smoothed, &parallel]);
//! assert!(result.warnings.is_empty());
//! assert_eq!(result.path.len(), 1);
//! assert!(result.path.subpaths()[0].is_closed());
//! ```
//!
//! # Features
//!
//! This crate either uses the standard library or the [`libm`] crate for
//! math functionality. The `std` feature is enabled by default, but can be
//! disabled, as long as the `libm` feature is enabled. This is useful for
//! `no_std` environments. However, note that the `libm` crate is not as
//! efficient as the standard library, and that this crate still uses the
//! `alloc` crate regardless.
//!
//! [`libm`]: https://docs.rs/libm

#![forbid(unsafe_code)]
#![deny(clippy::trivially_copy_pass_by_ref)]
#![warn(clippy::doc_markdown, rustdoc::broken_intra_doc_links)]
#![warn(clippy::semicolon_if_nothing_returned)]
#![warn(unused_qualifications)]
#![allow(
    clippy::unreadable_literal,
    clippy::many_single_char_names,
    clippy::excessive_precision,
    clippy::bool_to_int_with_if
)]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]
#![cfg_attr(all(not(feature = "std"), not(test)), no_std)]

#[cfg(not(any(feature = "std", feature = "libm")))]
compile_error!("pathdeform requires either the `std` or `libm` feature");

extern crate alloc;

mod affine;
mod arc;
pub mod common;
mod cubicbez;
mod cycloid;
mod deform;
mod fit;
mod intersect;
mod line;
mod parallel;
mod param_curve;
mod path;
mod point;
mod quadbez;
mod segment;
mod smoothed;
mod subpath;
mod vec2;

pub use crate::affine::*;
pub use crate::arc::*;
pub use crate::cubicbez::*;
pub use crate::cycloid::*;
pub use crate::deform::*;
pub use crate::fit::*;
pub use crate::line::*;
pub use crate::parallel::*;
pub use crate::param_curve::*;
pub use crate::path::*;
pub use crate::point::*;
pub use crate::quadbez::*;
pub use crate::segment::*;
pub use crate::smoothed::*;
pub use crate::subpath::*;
pub use crate::vec2::*;
