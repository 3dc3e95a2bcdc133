//! # Unit Components
//!
//! This module serves as the central hub for the tests of every model
//! component: the predictors, the cache and its prefetchers, and the
//! simulation drivers that feed them.
