//! Test support: in-memory backend, in-process API and end-to-end scenarios.
