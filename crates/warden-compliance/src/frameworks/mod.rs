//! The shipped framework checkers

pub mod dubai;
pub mod ethics;
pub mod nesa;
pub mod pdpl;

pub use dubai::DubaiAiLawChecker;
pub use ethics::AiEthicsChecker;
pub use nesa::NesaChecker;
pub use pdpl::PdplChecker;
