//! Cue queue and player tests.

mod queue_test;
