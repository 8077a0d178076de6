pub mod guitar;

#[cfg(test)]
mod guitar_tests;
