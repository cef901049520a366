// Copyright 2026 the pathdeform Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The deformer interface, its results and errors.

use alloc::vec::Vec;
use core::fmt;

use crate::{Path, Subpath};

/// One centimetre in PostScript points, the unit of all coordinates.
pub const CM: f64 = 72.0 / 2.54;

/// A geometric transformation from paths to paths.
///
/// Deformers work one subpath at a time and never modify their input. A
/// subpath the deformer cannot handle is returned unchanged, with a
/// warning describing why.
pub trait Deformer {
    /// Deform a single subpath.
    ///
    /// The result may consist of any number of subpaths. Non-fatal problems
    /// are appended to `warnings`.
    fn deform_subpath(&self, subpath: &Subpath, warnings: &mut Vec<WarningKind>) -> Path;

    /// Deform every subpath of a path.
    fn deform(&self, path: &Path) -> Deformed {
        let mut result = Deformed::default();
        for (i, subpath) in path.subpaths().iter().enumerate() {
            let mut kinds = Vec::new();
            let deformed = self.deform_subpath(subpath, &mut kinds);
            for kind in kinds {
                log::debug!("subpath {i}: {kind}");
                result.warnings.push(Warning { subpath: i, kind });
            }
            result.path.extend(deformed.into_subpaths());
        }
        result
    }
}

/// Apply deformers in order, each to the output of the previous one.
///
/// The warnings of all stages are collected; their subpath indices refer
/// to the input of the stage that raised them.
pub fn deform_chain(path: &Path, deformers: &[&dyn Deformer]) -> Deformed {
    let mut result = Deformed {
        path: path.clone(),
        warnings: Vec::new(),
    };
    for deformer in deformers {
        let stage = deformer.deform(&result.path);
        result.path = stage.path;
        result.warnings.extend(stage.warnings);
    }
    result
}

/// The outcome of a deformation: the new path and any warnings.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Deformed {
    /// The deformed path.
    pub path: Path,
    /// Non-fatal problems, in the order they were found.
    pub warnings: Vec<Warning>,
}

impl Deformed {
    /// The path, treating any warning as an error.
    ///
    /// # Errors
    ///
    /// Returns the first warning as [`DeformError::Warning`].
    pub fn strict(self) -> Result<Path, DeformError> {
        match self.warnings.first() {
            Some(w) => Err(DeformError::Warning(*w)),
            None => Ok(self.path),
        }
    }
}

/// A non-fatal problem found while deforming a subpath.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Warning {
    /// Index of the subpath in the deformer's input.
    pub subpath: usize,
    /// What happened.
    pub kind: WarningKind,
}

/// The kinds of [`Warning`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum WarningKind {
    /// The subpath is too short for the deformation and was returned
    /// unchanged.
    TooShort,
    /// A segment was left out because its geometry is undefined there.
    SegmentSkipped,
    /// All segments are shorter than the skip threshold; the subpath was
    /// returned unchanged.
    SmoothedAway,
    /// A curve fit failed and a simpler construction was used instead.
    FitFallback,
    /// The offset distance is below the tolerance; the subpath was returned
    /// unchanged.
    NegligibleDistance,
}

impl fmt::Display for WarningKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WarningKind::TooShort => write!(f, "subpath too short, left unchanged"),
            WarningKind::SegmentSkipped => write!(f, "segment skipped"),
            WarningKind::SmoothedAway => write!(f, "all segments below skip length, left unchanged"),
            WarningKind::FitFallback => write!(f, "curve fit failed, used fallback construction"),
            WarningKind::NegligibleDistance => write!(f, "offset distance negligible, left unchanged"),
        }
    }
}

/// Errors raised by deformers and the curve fit.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DeformError {
    /// A deformer was configured with an invalid parameter.
    InvalidParameter {
        /// The parameter's name.
        name: &'static str,
        /// The constraint it violates.
        reason: &'static str,
    },
    /// No cubic satisfies the requested end conditions.
    Unsolvable,
    /// A warning treated as an error, see [`Deformed::strict`].
    Warning(Warning),
}

impl fmt::Display for DeformError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeformError::InvalidParameter { name, reason } => {
                write!(f, "invalid parameter `{name}`: {reason}")
            }
            DeformError::Unsolvable => write!(f, "no curve satisfies the end conditions"),
            DeformError::Warning(w) => write!(f, "subpath {}: {}", w.subpath, w.kind),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for DeformError {}

/// Shorthand for rejecting a configuration value.
pub(crate) fn invalid(name: &'static str, reason: &'static str) -> DeformError {
    DeformError::InvalidParameter { name, reason }
}
