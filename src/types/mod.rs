pub mod bundle;
pub mod intake;

pub use bundle::*;
pub use intake::*;
