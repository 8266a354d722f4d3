pub mod aggregate;
pub mod firefly;
pub mod sankey;
