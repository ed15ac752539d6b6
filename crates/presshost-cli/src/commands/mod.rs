mod create_user;
mod serve;

pub use create_user::CreateUserCommand;
pub use serve::ServeCommand;
