//! API client library for reelscout.
//!
//! Provides the OMDb client and the UI-page composition built on top of it.

/// OMDb API client.
pub mod omdb;
