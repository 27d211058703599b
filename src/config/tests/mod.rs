//! Configuration tests, grouped by concern.

mod helpers;
