use std::sync::Arc;

use crate::db::DataClient;
use crate::users::{
    handlers::LoginUserController,
    repo::{FindUserRepository, SqlFindUserRepository},
    use_case::LoginUser,
};

/// Everything a request handler can reach, built once at startup.
#[derive(Clone)]
pub struct AppState {
    pub login_user: Arc<LoginUserController>,
}

impl AppState {
    pub fn init(client: DataClient) -> Self {
        let find_user = Arc::new(SqlFindUserRepository::new(client)) as Arc<dyn FindUserRepository>;
        Self::from_parts(find_user)
    }

    pub fn from_parts(find_user: Arc<dyn FindUserRepository>) -> Self {
        let login_user = Arc::new(LoginUserController::new(Arc::new(LoginUser::new(find_user))));
        Self { login_user }
    }

    #[cfg(test)]
    pub fn fake() -> Self {
        use crate::users::repo::FindUserRepositoryMock;

        Self::from_parts(Arc::new(FindUserRepositoryMock))
    }
}
