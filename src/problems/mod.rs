//! 具体的な問題定義。

pub mod advection;
pub mod heat;
pub mod stokes;

pub use advection::Advection;
pub use heat::Heat;
pub use stokes::Stokes;
