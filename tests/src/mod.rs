#[cfg(test)]
pub mod gate_view_tests;
#[cfg(test)]
pub mod mint_flow_tests;
#[cfg(test)]
pub mod support;
