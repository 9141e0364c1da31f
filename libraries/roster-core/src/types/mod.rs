mod ids;
mod page;
mod session;
mod user;

pub use ids::UserId;
pub use page::UserPage;
pub use session::{Credentials, SessionToken};
pub use user::{avatar_url, CreatedUser, NewUser, User, UserPatch};
