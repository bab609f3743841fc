//! GitLab release plugin for hook-driven release pipelines
//!
//! Creates GitLab releases, uploads binary assets as generic packages,
//! attaches external links, and associates milestones — invoked by a release
//! orchestrator at lifecycle hooks. Stateless: every invocation builds its
//! configuration fresh and discards it with the response.
//!
//! The interesting parts live in `core`: normalization of untrusted config
//! maps, field-addressable validation, and working-directory confinement of
//! asset paths. The GitLab REST client is a thin, single-attempt wrapper.

pub mod core;
pub mod gitlab;
pub mod hooks;
pub mod plugin;
pub mod release;
