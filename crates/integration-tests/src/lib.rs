//! End-to-end tests for Roastcam live under `tests/`
