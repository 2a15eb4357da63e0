//! Scenario benchmarks: whole callback blocks through the driver.

mod driver;

pub use driver::bench_driver;
