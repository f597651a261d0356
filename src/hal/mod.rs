//! Register access layer.
//!
//! [`RegisterIo`] is the single seam between the adapter core and the
//! silicon. Production code maps BAR0 into an [`MmioWindow`]; tests plug in
//! [`crate::testing::SimulatedNic`].

pub mod io;
pub mod mdio;
pub mod mmio;
pub mod regs;

#[cfg(test)]
mod tests;

pub use io::{RegisterIo, merge, read_u64, split_u64};
pub use mmio::MmioWindow;
