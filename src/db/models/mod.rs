mod user;
mod course;
mod cart;
mod enrollment;
mod certificate;
mod review;

pub use user::*;
pub use course::*;
pub use cart::*;
pub use enrollment::*;
pub use certificate::*;
pub use review::*;
