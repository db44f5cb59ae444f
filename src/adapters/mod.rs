//! Adapter implementations of the port traits.

#[cfg(test)]
pub mod fixed;
pub mod live;
