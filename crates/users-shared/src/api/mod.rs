mod response;
mod users;

pub use response::*;
pub use users::*;
