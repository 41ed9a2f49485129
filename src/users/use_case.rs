use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, instrument};

use crate::error::ErrorModel;
use crate::users::{dto::Credentials, model::UserModel, repo::FindUserRepository};

#[async_trait]
pub trait LoginUserUseCase: Send + Sync {
    async fn login(&self, body: Credentials) -> Result<UserModel, ErrorModel>;
}

pub struct LoginUser {
    find_user: Arc<dyn FindUserRepository>,
}

impl LoginUser {
    pub fn new(find_user: Arc<dyn FindUserRepository>) -> Self {
        Self { find_user }
    }
}

#[async_trait]
impl LoginUserUseCase for LoginUser {
    #[instrument(skip_all, fields(username = %body.username))]
    async fn login(&self, body: Credentials) -> Result<UserModel, ErrorModel> {
        let record = self
            .find_user
            .execute(&body.username)
            .await
            .map_err(|e| ErrorModel::from_error(e))?;

        let user = UserModel::from(record);
        user.is_valid_user()?.has_valid_password(&body.password)?;

        info!(user_id = ?user.id, "user logged in");
        Ok(user)
    }
}
