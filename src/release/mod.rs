// ABOUTME: Release controller: applies an uploaded artifact to the deployed root.
// ABOUTME: Ordered fail-fast steps with a best-effort snapshot of the previous release.

mod controller;

pub use controller::{ReleaseController, ReleaseError, ReleaseReport};
