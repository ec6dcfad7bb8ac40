//! Test modules for the action runner

mod sequencing;
