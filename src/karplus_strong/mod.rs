pub mod karplus_strong;
