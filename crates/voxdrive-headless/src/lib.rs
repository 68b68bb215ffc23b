pub mod cdp;
pub mod driver;

pub use driver::HeadlessDriver;
