pub mod cache;
pub mod compare;
pub mod detail;
pub mod letter;
pub mod load;
pub mod search;

pub use cache::*;
pub use compare::*;
pub use detail::*;
pub use letter::*;
pub use load::*;
pub use search::*;
