// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error type shared by the pool and the grid builder.

/// Errors surfaced by [`GridWindowBuilder::build`](crate::GridWindowBuilder::build)
/// and [`CellPool::try_get`](crate::CellPool::try_get).
///
/// The `Missing*` variants are configuration errors: a grid without one of its
/// host collaborators cannot run, so building fails instead of producing a
/// partially wired engine. [`GridError::MalformedCell`] is recoverable and the
/// engine absorbs it by leaving the affected slot empty.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum GridError {
    /// No [`Viewport`](crate::Viewport) was supplied.
    #[error("grid window has no viewport")]
    MissingViewport,
    /// No [`ContentSurface`](crate::ContentSurface) was supplied.
    #[error("grid window has no content surface")]
    MissingContent,
    /// No [`ScrollSource`](crate::ScrollSource) was supplied.
    #[error("grid window has no scroll source")]
    MissingScrollSource,
    /// No [`CellFactory`](crate::CellFactory) was supplied.
    #[error("grid window has no cell factory")]
    MissingCellFactory,
    /// The cell factory did not produce a usable cell.
    #[error("cell factory did not produce a usable cell")]
    MalformedCell,
}
