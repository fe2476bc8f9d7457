pub mod region;
pub mod preprocessing;
pub mod extraction;
pub mod simplification;
pub mod classification;
pub mod verdict;

pub use region::*;
pub use preprocessing::*;
pub use extraction::*;
pub use simplification::*;
pub use classification::{Classification, ZigZagClassifier};
pub use verdict::*;
