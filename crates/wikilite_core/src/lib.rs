//! Core pipeline for the wikilite reading proxy: fetch a remote page, prune
//! the parts a low-power client cannot use, and serialize the remainder into
//! a minimal HTML vocabulary with proxy-routed links.

pub mod config;
pub mod fetch;
pub mod normalize;
pub mod pipeline;
pub mod prune;
pub mod rules;
pub mod sections;
pub mod simplify;
