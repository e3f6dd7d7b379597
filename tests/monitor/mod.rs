//! Line monitor tests.

mod line_test;
