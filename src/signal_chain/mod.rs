pub mod filter;
pub mod mixer;
pub mod reverb;
pub mod signal_chain;

#[cfg(test)]
mod signal_chain_tests;
